//! Process wide defaults used by the builders in this crate
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

/// Default values picked up by [`crate::metabolic_model::reaction::ReactionBuilder`] and
/// [`crate::scope::ScopeOptionsBuilder`] when a field is left unset
pub struct Configuration {
    /// Lower flux bound given to new reactions
    pub lower_bound: f64,
    /// Upper flux bound given to new reactions
    pub upper_bound: f64,
    /// Whether bootstrap compounds (and their edges) are kept in scope results
    pub include_bootstraps: bool,
    /// Whether bootstrap compounds queue the reactions consuming them
    pub expand_through_bootstraps: bool,
    /// Whether scope computations record the step each node was first visited at
    pub trace: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            include_bootstraps: false,
            expand_through_bootstraps: false,
            trace: false,
        }
    }
}
