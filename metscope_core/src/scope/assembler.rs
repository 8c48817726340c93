//! Materializes the scope network from a finished expansion and prunes dead ends
use indexmap::IndexSet;
use tracing::debug;

use super::state::ExpansionState;
use super::ScopeOptions;
use crate::network::{BipartiteNetwork, NetworkError, Node};

/// Build a fresh network holding the visited compounds, fired reactions and their edges
///
/// Bootstrap compounds and every edge touching them are left out unless
/// [`ScopeOptions::include_bootstraps`] is set.
pub fn assemble(
    network: &BipartiteNetwork,
    state: &ExpansionState,
    options: &ScopeOptions,
) -> Result<BipartiteNetwork, NetworkError> {
    let excluded =
        |compound: &str| !options.include_bootstraps && options.bootstraps.contains(compound);
    let mut scope = BipartiteNetwork::new();
    for &id in state.visited_compounds() {
        if excluded(id) {
            continue;
        }
        if let Some(compound) = network.compound(id) {
            scope.add_compound(compound.clone())?;
        }
    }
    for id in state.visited_reactions().keys() {
        let Some(reaction) = network.reaction(id) else {
            continue;
        };
        scope.add_reaction(reaction.clone())?;
        for edge in reaction.edges() {
            if excluded(edge.compound.as_str()) {
                continue;
            }
            if !scope.contains_compound(&edge.compound) {
                let Some(compound) = network.compound(&edge.compound) else {
                    continue;
                };
                scope.add_compound(compound.clone())?;
            }
            scope.add_edge(edge)?;
        }
    }
    Ok(scope)
}

/// Repeatedly remove sinks which are not targets, returns the number of removed nodes
///
/// Does nothing when `targets` is empty. Targets are kept even when they are sinks.
pub fn prune(scope: &mut BipartiteNetwork, targets: &IndexSet<String>) -> usize {
    if targets.is_empty() {
        return 0;
    }
    let is_target = |node: &Node| matches!(node, Node::Compound(id) if targets.contains(id));
    let mut removed = 0;
    loop {
        let sinks: Vec<Node> = scope
            .nodes()
            .into_iter()
            .filter(|node| scope.out_degree(node) == 0 && !is_target(node))
            .collect();
        if sinks.is_empty() {
            break;
        }
        for node in &sinks {
            scope.remove_node(node);
        }
        removed += sinks.len();
    }
    debug!(removed, "pruned scope");
    removed
}
