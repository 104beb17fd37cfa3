use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the ingredient catalog CSV
    #[arg(short, long, default_value = "catalog.csv")]
    pub catalog_file: String,

    /// Account email for this session
    #[arg(long)]
    pub email: String,

    /// Display name for this session
    #[arg(long)]
    pub name: String,

    /// Meal type: Breakfast, Lunch, Dinner or Snack
    #[arg(long, default_value = "Dinner")]
    pub meal_type: String,

    /// Ingredient key to toggle into the pantry (repeatable)
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,

    /// Display language for catalog names
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Wait out the regenerate cooldown before exiting
    #[arg(long)]
    pub wait_cooldown: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
