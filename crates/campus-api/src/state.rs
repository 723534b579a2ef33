//! Shared application state for the campus API.
//!
//! [`AppState`] bundles the rule engine, the directory, and the report
//! aggregator, all over one [`EntityStore`] handle. Handlers receive it
//! as `State<Arc<AppState<S>>>`.

use campus_core::{Directory, ParticipationEngine, ReportingAggregator};
use campus_store::EntityStore;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState<S> {
    /// Mutating transitions.
    pub engine: ParticipationEngine<S>,
    /// Lookups and listings.
    pub directory: Directory<S>,
    /// Participation reports.
    pub reports: ReportingAggregator<S>,
}

impl<S: EntityStore> AppState<S> {
    /// Wire every component to the same store.
    pub fn new(store: S) -> Self {
        Self {
            engine: ParticipationEngine::new(store.clone()),
            directory: Directory::new(store.clone()),
            reports: ReportingAggregator::new(store),
        }
    }
}
