use chrono::Local;
use std::sync::Arc;
use std::time::Duration;

use crate::api_connection::connection::MealApi;
use crate::api_connection::endpoints::{MealRequest, RecipeResult};
use crate::session::store::SessionStore;

/// Ticks (seconds) the regenerate action stays locked after a success.
pub const COOLDOWN_TICKS: u32 = 75;

/// Lifecycle of one meal-generation request, plus the post-success cooldown.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPhase {
    /// No request in flight and no cooldown running.
    Idle,
    /// A request is in flight; submission is locked.
    Loading,
    /// A result was rendered; `cooldown_remaining` ticks until re-enable.
    Success { cooldown_remaining: u32 },
    /// The request failed; `message` is shown inline with a retry action.
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    Submit,
    Completed,
    Failed(String),
    CooldownTick,
    Retry,
}

/// Pure transition function over (phase, event). Events that do not apply in
/// the current phase leave it unchanged, which is what makes the in-flight
/// and in-cooldown submission locks hold.
pub fn step(phase: &RequestPhase, event: &RequestEvent) -> RequestPhase {
    match (phase, event) {
        (RequestPhase::Idle, RequestEvent::Submit) => RequestPhase::Loading,
        (RequestPhase::Loading, RequestEvent::Completed) => RequestPhase::Success {
            cooldown_remaining: COOLDOWN_TICKS,
        },
        (RequestPhase::Loading, RequestEvent::Failed(message)) => RequestPhase::Error {
            message: message.clone(),
        },
        (RequestPhase::Success { cooldown_remaining }, RequestEvent::CooldownTick) => {
            if *cooldown_remaining <= 1 {
                RequestPhase::Idle
            } else {
                RequestPhase::Success {
                    cooldown_remaining: cooldown_remaining - 1,
                }
            }
        }
        (RequestPhase::Error { .. }, RequestEvent::Retry) => RequestPhase::Loading,
        _ => phase.clone(),
    }
}

/// Owns the request lifecycle for one view: builds the payload from the
/// session, drives the phase machine around the network call, and gates
/// re-submission behind the cooldown.
///
/// A single instance never has two requests in flight; a duplicate instance
/// over the same account (e.g. a second open client) is not coordinated
/// against, by design.
pub struct RecipeRequestOrchestrator<S: SessionStore> {
    api: Arc<dyn MealApi>,
    store: S,
    phase: RequestPhase,
    last_result: Option<RecipeResult>,
}

impl<S: SessionStore> RecipeRequestOrchestrator<S> {
    pub fn new(api: Arc<dyn MealApi>, store: S) -> Self {
        RecipeRequestOrchestrator {
            api,
            store,
            phase: RequestPhase::Idle,
            last_result: None,
        }
    }

    pub fn phase(&self) -> &RequestPhase {
        &self.phase
    }

    /// The rendered recommendation, kept until the next request supersedes it.
    pub fn last_result(&self) -> Option<&RecipeResult> {
        self.last_result.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Whether the regenerate affordance is enabled: disabled while loading
    /// and for every cooldown tick above zero.
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, RequestPhase::Idle | RequestPhase::Error { .. })
    }

    /// Remaining cooldown ticks for display; zero outside the cooldown.
    pub fn cooldown_remaining(&self) -> u32 {
        match self.phase {
            RequestPhase::Success { cooldown_remaining } => cooldown_remaining,
            _ => 0,
        }
    }

    /// Issues the meal-generation request and resolves it to `Success` or
    /// `Error`. Submitting while a request is in flight or the cooldown is
    /// running is a no-op: the transport is not called a second time.
    ///
    /// From `Error` this acts as the explicit retry. Every failure is folded
    /// into the `Error` phase; nothing propagates to the caller.
    pub async fn submit(&mut self) -> &RequestPhase {
        if !self.can_submit() {
            return &self.phase;
        }
        let trigger = match self.phase {
            RequestPhase::Error { .. } => RequestEvent::Retry,
            _ => RequestEvent::Submit,
        };
        self.phase = step(&self.phase, &trigger);

        let request = match self.build_request() {
            Ok(request) => request,
            Err(message) => {
                self.phase = step(&self.phase, &RequestEvent::Failed(message));
                return &self.phase;
            }
        };

        match self.api.generate_meal(&request).await {
            Ok(result) => {
                self.last_result = Some(result);
                self.phase = step(&self.phase, &RequestEvent::Completed);
            }
            Err(err) => {
                // No partial result is ever rendered.
                self.last_result = None;
                self.phase = step(&self.phase, &RequestEvent::Failed(err.user_message()));
            }
        }
        &self.phase
    }

    /// Advances the cooldown by one tick and returns the remaining count.
    /// Outside the cooldown this is a no-op returning zero.
    pub fn tick(&mut self) -> u32 {
        self.phase = step(&self.phase, &RequestEvent::CooldownTick);
        self.cooldown_remaining()
    }

    /// Drives the cooldown off a wall-clock interval until it expires,
    /// reporting each remaining count through `on_tick`. Purely a UI-gating
    /// timer; it touches no network state.
    pub async fn run_cooldown(&mut self, mut on_tick: impl FnMut(u32)) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await; // first tick resolves immediately
        while matches!(self.phase, RequestPhase::Success { .. }) {
            interval.tick().await;
            on_tick(self.tick());
        }
    }

    fn build_request(&self) -> Result<MealRequest, String> {
        let identity = self
            .store
            .identity()
            .ok_or_else(|| "No active session. Please log in again.".to_string())?;
        let pantry = self.store.pantry();
        Ok(MealRequest {
            family_members: identity.family.clone(),
            ingredients: pantry.ingredient_list(),
            meal_type: pantry.meal_type,
            day_of_week: Local::now().format("%A").to_string(),
        })
    }
}
