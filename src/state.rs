/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to clone (everything inside is Arc-backed)
 */
use crate::services::DecisionService;

#[derive(Clone)]
pub struct AppState {
    pub decisions: DecisionService,
}

impl AppState {
    pub fn new(decisions: DecisionService) -> Self {
        Self { decisions }
    }
}
