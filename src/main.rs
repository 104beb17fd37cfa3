use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use mealflow::api_connection::connection::{HttpMealApi, MealApi};
use mealflow::catalog::loader::load_catalog;
use mealflow::catalog::recency::{rank_with_recents, UsageCounters};
use mealflow::cli::parse_args;
use mealflow::nav::{guard, GuardOutcome};
use mealflow::orchestrator::{RecipeRequestOrchestrator, RequestPhase};
use mealflow::session::family::Identity;
use mealflow::session::pantry::{MealType, PantrySelectionSet};
use mealflow::session::store::{MemorySessionStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env for MEALFLOW_API_URL

    let cli_args = parse_args();

    println!("Loading ingredient catalog from: {}", cli_args.catalog_file);
    let catalog = load_catalog(Path::new(&cli_args.catalog_file))
        .with_context(|| format!("Failed to load catalog from '{}'", cli_args.catalog_file))?;

    let api: Arc<dyn MealApi> = Arc::new(HttpMealApi::from_env());

    // Start the session: identity first, then locale and pantry.
    let mut store = MemorySessionStore::new();
    store.set_identity(Identity::new(cli_args.email.clone(), cli_args.name.clone()));
    store.set_locale(cli_args.locale.clone());

    if guard(&store, true) == GuardOutcome::RedirectToEntry {
        // Unreachable with the identity set above, but the check runs first
        // on every session-requiring view.
        anyhow::bail!("No active session; please log in first.");
    }

    let counters: UsageCounters = match api.usage_counters(&cli_args.email).await {
        Ok(counters) => counters,
        Err(e) => {
            eprintln!("Could not fetch usage counters ({}); showing plain catalog.", e);
            UsageCounters::new()
        }
    };

    let display_catalog = rank_with_recents(&catalog, &counters);
    println!("\nAvailable ingredients:");
    for group in &display_catalog {
        println!("  {}:", group.category);
        for record in &group.ingredients {
            println!("    - {}", record.display_name(&cli_args.locale));
        }
    }

    let meal_type: MealType = cli_args
        .meal_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    {
        let mut pantry = PantrySelectionSet::new(&mut store);
        pantry.set_meal_type(meal_type);
        for key in &cli_args.ingredients {
            let selected = pantry.toggle(key);
            println!("{} '{}'", if selected { "Selected" } else { "Deselected" }, key);
        }
        println!("\nPantry: {:?} ({})", pantry.selected(), pantry.meal_type());
    }

    let mut orchestrator = RecipeRequestOrchestrator::new(api, store);
    println!("\nRequesting a meal recommendation...");
    orchestrator.submit().await;

    match orchestrator.phase() {
        RequestPhase::Error { message } => {
            eprintln!("\nCould not generate a meal: {}", message);
            eprintln!("Run again to retry.");
            return Ok(());
        }
        _ => {
            if let Some(result) = orchestrator.last_result() {
                print_recipe(result);
            }
        }
    }

    if cli_args.wait_cooldown {
        println!("\nCooldown before the next request:");
        orchestrator
            .run_cooldown(|remaining| {
                if remaining > 0 {
                    print!("\rRegenerate available in {}s ", remaining);
                    std::io::stdout().flush().ok();
                } else {
                    println!("\rRegenerate available now.          ");
                }
            })
            .await;
    } else {
        println!(
            "\nRegenerate locked for {}s (pass --wait-cooldown to wait it out).",
            orchestrator.cooldown_remaining()
        );
    }

    Ok(())
}

fn print_recipe(result: &mealflow::api_connection::endpoints::RecipeResult) {
    println!("\n=== {} ===", result.meal.name);
    println!("[{}] {}", result.meal.meal_kind, result.meal.why_this_meal);
    println!("Total time: {} minutes", result.recipe.total_time_minutes);

    println!("\nIngredients used:");
    for used in &result.ingredients_used {
        println!("  - {}", used.ingredient);
    }

    println!("\nSteps:");
    for (i, step) in result.recipe.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    if let Some(notes) = &result.serving_notes {
        println!("\nServing notes: {}", notes);
    }
    if let Some(tips) = &result.tips {
        println!("\nTips:");
        for tip in tips {
            println!("  - {}", tip);
        }
    }
    if let Some(recommendations) = &result.member_specific_recommendations {
        println!("\nPer member:");
        for rec in recommendations {
            println!("  - {}: {}", rec.name, rec.recommendation);
        }
    }
}
