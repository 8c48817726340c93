//! Metabolic scope computation
//!
//! The scope of a set of seed compounds is everything reachable by repeatedly firing reactions
//! whose consumed compounds are all available. Bootstrap compounds (water, cofactors, ...) are
//! available from the start but kept out of the result unless asked for. When targets are
//! given, branches of the result leading to no target are pruned.
//!
//! # Examples
//! ```rust
//! use metscope_core::network::{BipartiteNetwork, ReactionNode};
//! use metscope_core::scope::{compute_scope, ScopeOptionsBuilder};
//! let mut network = BipartiteNetwork::new();
//! network.insert_reaction(ReactionNode::new("R1", &["A", "W"], &["C"], false)).unwrap();
//! let options = ScopeOptionsBuilder::default()
//!     .seeds(["A"])
//!     .bootstraps(["W"])
//!     .build()
//!     .unwrap();
//! let scope = compute_scope(&network, &options).unwrap();
//! assert!(scope.contains_compound("C"));
//! assert!(!scope.contains_compound("W"));
//! ```
pub mod assembler;
pub mod availability;
pub mod state;
pub mod traversal;

use derive_builder::Builder;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::configuration::CONFIGURATION;
use crate::network::{BipartiteNetwork, ConsistencyError, NetworkError};

pub use assembler::{assemble, prune};
pub use availability::{is_available, Direction};
pub use state::{ExpansionState, ExpansionTrace};
pub use traversal::{Expansion, FiredReaction};

// region Options
/// Inputs of a scope computation
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ScopeOptions {
    /// Compounds available at the start
    #[builder(default, setter(custom))]
    pub seeds: IndexSet<String>,
    /// Compounds always available, disjoint from the seeds
    #[builder(default, setter(custom))]
    pub bootstraps: IndexSet<String>,
    /// Compounds the result should lead to, empty disables pruning
    #[builder(default, setter(custom))]
    pub targets: IndexSet<String>,
    /// Reactions which are never fired
    #[builder(default, setter(custom))]
    pub avoided_reactions: IndexSet<String>,
    /// Keep bootstrap compounds and their edges in the result
    #[builder(default = "CONFIGURATION.read().unwrap().include_bootstraps")]
    pub include_bootstraps: bool,
    /// Let bootstrap compounds queue the reactions consuming them
    #[builder(default = "CONFIGURATION.read().unwrap().expand_through_bootstraps")]
    pub expand_through_bootstraps: bool,
    /// Record the step each node was first visited at
    #[builder(default = "CONFIGURATION.read().unwrap().trace")]
    pub trace: bool,
    /// Stop expanding once every target has been visited
    #[builder(default = "false")]
    pub stop_at_targets: bool,
}

fn to_id_set<I, S>(ids: I) -> IndexSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(Into::into).collect()
}

impl ScopeOptionsBuilder {
    pub fn seeds<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, ids: I) -> &mut Self {
        self.seeds = Some(to_id_set(ids));
        self
    }

    pub fn bootstraps<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, ids: I) -> &mut Self {
        self.bootstraps = Some(to_id_set(ids));
        self
    }

    pub fn targets<I: IntoIterator<Item = S>, S: Into<String>>(&mut self, ids: I) -> &mut Self {
        self.targets = Some(to_id_set(ids));
        self
    }

    pub fn avoided_reactions<I: IntoIterator<Item = S>, S: Into<String>>(
        &mut self,
        ids: I,
    ) -> &mut Self {
        self.avoided_reactions = Some(to_id_set(ids));
        self
    }

    fn validate(&self) -> Result<(), String> {
        if let (Some(seeds), Some(bootstraps)) = (&self.seeds, &self.bootstraps) {
            check_overlap(seeds, bootstraps).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

fn check_overlap(
    seeds: &IndexSet<String>,
    bootstraps: &IndexSet<String>,
) -> Result<(), ConfigurationError> {
    match seeds.iter().find(|s| bootstraps.contains(*s)) {
        Some(compound) => Err(ConfigurationError::SeedBootstrapOverlap(compound.clone())),
        None => Ok(()),
    }
}

impl ScopeOptions {
    /// Check the options against the network they will be used on
    ///
    /// Seeds and bootstraps must be disjoint, every compound id must name a compound of the
    /// network and every avoided reaction a reaction of the network.
    pub fn validate(&self, network: &BipartiteNetwork) -> Result<(), ConfigurationError> {
        check_overlap(&self.seeds, &self.bootstraps)?;
        let compounds = self
            .seeds
            .iter()
            .chain(self.bootstraps.iter())
            .chain(self.targets.iter());
        for id in compounds {
            if !network.contains_compound(id) {
                return Err(ConfigurationError::UnknownCompound(id.clone()));
            }
        }
        for id in self.avoided_reactions.iter() {
            if !network.contains_reaction(id) {
                return Err(ConfigurationError::UnknownReaction(id.clone()));
            }
        }
        Ok(())
    }
}
// endregion Options

// region Errors
/// Invalid inputs to a scope computation
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Compound {0} is both a seed and a bootstrap compound")]
    SeedBootstrapOverlap(String),
    #[error("Compound {0} is not present in the network")]
    UnknownCompound(String),
    #[error("Reaction {0} is not present in the network")]
    UnknownReaction(String),
}

/// Errors raised by [`compute_scope`], all of them before any expansion happens
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Invalid scope configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Network failed the consistency check: {0}")]
    Consistency(#[from] ConsistencyError),
    #[error("Unable to build the scope network: {0}")]
    Assembly(#[from] NetworkError),
}
// endregion Errors

// region Result
/// Outcome of a scope computation
#[derive(Clone, Debug, Serialize)]
pub struct ScopeResult {
    /// The (possibly pruned) scope network
    pub network: BipartiteNetwork,
    /// Every reaction fired during expansion with the direction it fired in, in firing order
    pub directions: IndexMap<String, Direction>,
    /// First visit step of every node, when tracing was requested
    pub trace: Option<ExpansionTrace>,
    /// Targets never visited during expansion
    pub missing_targets: Vec<String>,
}

impl ScopeResult {
    pub fn contains_compound(&self, id: &str) -> bool {
        self.network.contains_compound(id)
    }

    pub fn contains_reaction(&self, id: &str) -> bool {
        self.network.contains_reaction(id)
    }

    pub fn direction_of(&self, reaction: &str) -> Option<Direction> {
        self.directions.get(reaction).copied()
    }

    /// Whether every requested target was visited
    pub fn targets_reached(&self) -> bool {
        self.missing_targets.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
// endregion Result

/// Compute the scope of `options.seeds` in `network`
///
/// Runs the expansion to its fixed point (or until all targets are visited when
/// [`ScopeOptions::stop_at_targets`] is set), assembles the result network and prunes it
/// against the targets.
///
/// # Errors
/// Returns a [`ScopeError`] if the options are invalid for this network or the network is
/// inconsistent. Unreached targets are not an error, see [`ScopeResult::missing_targets`].
pub fn compute_scope(
    network: &BipartiteNetwork,
    options: &ScopeOptions,
) -> Result<ScopeResult, ScopeError> {
    let mut expansion = Expansion::new(network, options)?;
    loop {
        if options.stop_at_targets && expansion.targets_reached() {
            debug!("all targets reached, stopping expansion");
            break;
        }
        if expansion.step().is_none() {
            break;
        }
    }
    let state = expansion.into_state();
    let mut scope = assemble(network, &state, options)?;
    let pruned = prune(&mut scope, &options.targets);

    let missing_targets: Vec<String> = options
        .targets
        .iter()
        .filter(|t| !state.is_compound_visited(t))
        .cloned()
        .collect();
    if !missing_targets.is_empty() {
        warn!(missing = ?missing_targets, "targets not reached");
    }
    info!(
        compounds = scope.compound_count(),
        reactions = scope.reaction_count(),
        pruned,
        steps = state.step(),
        "computed scope"
    );

    let directions = state
        .visited_reactions()
        .iter()
        .map(|(id, direction)| (id.to_string(), *direction))
        .collect();
    Ok(ScopeResult {
        network: scope,
        directions,
        trace: state.into_trace(),
        missing_targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Edge, Node, ReactantRole, ReactionNode, Side};

    fn network_of(reactions: &[(&str, &[&str], &[&str], bool)]) -> BipartiteNetwork {
        let mut network = BipartiteNetwork::new();
        for (id, substrates, products, reversible) in reactions {
            network
                .insert_reaction(ReactionNode::new(id, *substrates, *products, *reversible))
                .unwrap();
        }
        network
    }

    #[test]
    fn single_irreversible_reaction() {
        let network = network_of(&[("R1", &["A"], &["B"], false)]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert_eq!(scope.network.compound_count(), 2);
        assert!(scope.contains_compound("A"));
        assert!(scope.contains_compound("B"));
        assert_eq!(scope.network.reaction_count(), 1);
        assert_eq!(scope.direction_of("R1"), Some(Direction::Forward));
    }

    #[test]
    fn reversible_reaction_fires_in_reverse() {
        let network = network_of(&[("R1", &["B"], &["A"], true)]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert!(scope.contains_compound("B"));
        assert!(scope.contains_reaction("R1"));
        assert_eq!(scope.direction_of("R1"), Some(Direction::Reverse));
    }

    #[test]
    fn bootstraps_complete_substrate_sets() {
        let network = network_of(&[("R2", &["A", "W"], &["C"], false)]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .bootstraps(["W"])
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert!(scope.contains_compound("C"));
        assert!(scope.contains_reaction("R2"));
        assert!(!scope.contains_compound("W"));
        assert_eq!(scope.network.edges_of("R2").len(), 2);

        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert!(!scope.contains_compound("C"));
        assert!(!scope.contains_reaction("R2"));
    }

    #[test]
    fn include_bootstraps_keeps_their_edges() {
        let network = network_of(&[("R2", &["A", "W"], &["C"], false)]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .bootstraps(["W"])
            .include_bootstraps(true)
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert!(scope.contains_compound("W"));
        assert_eq!(scope.network.edges_of("R2").len(), 3);
    }

    #[test]
    fn unreachable_target_is_not_an_error() {
        let network = network_of(&[
            ("R1", &["A"], &["B"], false),
            ("R2", &["Y"], &["Z"], false),
        ]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .targets(["Z"])
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert!(!scope.contains_compound("Z"));
        assert!(!scope.targets_reached());
        assert_eq!(scope.missing_targets, vec!["Z".to_string()]);
    }

    #[test]
    fn pruning_removes_non_target_branches() {
        let network = network_of(&[
            ("R1", &["A"], &["B"], false),
            ("R2", &["B"], &["C"], false),
            ("R3", &["B"], &["D"], false),
        ]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .targets(["C"])
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        for id in ["A", "B", "C"] {
            assert!(scope.contains_compound(id));
        }
        assert!(!scope.contains_compound("D"));
        assert!(!scope.contains_reaction("R3"));
        assert!(scope.contains_reaction("R1"));
        assert!(scope.contains_reaction("R2"));
        // the traversal record still has the pruned reaction
        assert_eq!(scope.direction_of("R3"), Some(Direction::Forward));
    }

    #[test]
    fn stop_at_targets_ends_expansion_early() {
        let network = network_of(&[
            ("R1", &["A"], &["B"], false),
            ("R2", &["B"], &["C"], false),
        ]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .targets(["B"])
            .stop_at_targets(true)
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        assert!(scope.contains_compound("B"));
        assert!(scope.direction_of("R2").is_none());
        assert!(!scope.contains_compound("C"));
    }

    #[test]
    fn trace_records_growth() {
        let network = network_of(&[
            ("R1", &["A"], &["B"], false),
            ("R2", &["B", "W"], &["C"], false),
        ]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .bootstraps(["W"])
            .trace(true)
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        let trace = scope.trace.as_ref().unwrap();
        let step = |node: Node| trace.step_of(&node);
        assert_eq!(step(Node::Compound("A".to_string())), Some(0));
        assert_eq!(step(Node::Compound("W".to_string())), Some(0));
        assert_eq!(step(Node::Reaction("R1".to_string())), Some(1));
        assert_eq!(step(Node::Compound("B".to_string())), Some(1));
        assert_eq!(step(Node::Reaction("R2".to_string())), Some(2));
        assert_eq!(step(Node::Compound("C".to_string())), Some(2));
    }

    #[test]
    fn seed_bootstrap_overlap_rejected_by_builder() {
        let result = ScopeOptionsBuilder::default()
            .seeds(["A", "W"])
            .bootstraps(["W"])
            .build();
        assert!(matches!(
            result,
            Err(ScopeOptionsBuilderError::ValidationError(_))
        ));
    }

    #[test]
    fn seed_bootstrap_overlap_rejected_by_scope() {
        let network = network_of(&[("R1", &["A"], &["B"], false)]);
        let mut options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .build()
            .unwrap();
        options.bootstraps.insert("A".to_string());
        let err = compute_scope(&network, &options).unwrap_err();
        assert!(matches!(
            err,
            ScopeError::Configuration(ConfigurationError::SeedBootstrapOverlap(ref c)) if c == "A"
        ));
    }

    #[test]
    fn unknown_ids_rejected() {
        let network = network_of(&[("R1", &["A"], &["B"], false)]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .targets(["Q"])
            .build()
            .unwrap();
        assert_eq!(
            options.validate(&network),
            Err(ConfigurationError::UnknownCompound("Q".to_string()))
        );
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .avoided_reactions(["R9"])
            .build()
            .unwrap();
        assert!(matches!(
            compute_scope(&network, &options),
            Err(ScopeError::Configuration(ConfigurationError::UnknownReaction(_)))
        ));
    }

    #[test]
    fn inconsistent_network_rejected() {
        let mut network = network_of(&[("R1", &["A"], &["B"], false)]);
        network
            .add_edge(Edge::new("B", "R1", ReactantRole::Substrate, Side::Right))
            .unwrap();
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .build()
            .unwrap();
        assert!(matches!(
            compute_scope(&network, &options),
            Err(ScopeError::Consistency(
                ConsistencyError::ReverseEdgeOnIrreversible(_)
            ))
        ));
    }

    #[test]
    fn half_recorded_network_rejected() {
        let network = network_of(&[
            ("R1", &["A"], &["B"], false),
            ("R2", &["B"], &["C"], false),
        ]);
        let mut value = serde_json::to_value(&network).unwrap();
        value["compounds"]["B"]["consumers"] = serde_json::json!([]);
        let network: BipartiteNetwork = serde_json::from_value(value).unwrap();
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .build()
            .unwrap();
        assert!(matches!(
            compute_scope(&network, &options),
            Err(ScopeError::Consistency(
                ConsistencyError::AdjacencyMismatch { .. }
            ))
        ));
    }

    #[test]
    fn same_inputs_same_json() {
        let network = network_of(&[
            ("R1", &["A"], &["B"], false),
            ("R2", &["A"], &["C"], true),
            ("R3", &["B", "C", "W"], &["D"], false),
            ("R4", &["D"], &["E"], false),
        ]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .bootstraps(["W"])
            .targets(["D"])
            .trace(true)
            .build()
            .unwrap();
        let first = compute_scope(&network, &options).unwrap();
        let second = compute_scope(&network, &options).unwrap();
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        let order: Vec<&String> = first.directions.keys().collect();
        assert_eq!(order, ["R1", "R2", "R3", "R4"]);
    }

    #[test]
    fn result_serializes_to_json() {
        let network = network_of(&[("R1", &["A"], &["B"], false)]);
        let options = ScopeOptionsBuilder::default()
            .seeds(["A"])
            .trace(true)
            .build()
            .unwrap();
        let scope = compute_scope(&network, &options).unwrap();
        let json: serde_json::Value = serde_json::from_str(&scope.to_json().unwrap()).unwrap();
        assert_eq!(json["directions"]["R1"], "Forward");
        assert_eq!(json["trace"]["steps"].as_array().unwrap().len(), 3);
        assert!(json["network"]["compounds"]["B"].is_object());
    }
}
