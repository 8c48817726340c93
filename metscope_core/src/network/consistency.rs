//! Checks that the edge topology agrees with the reactions' declared compound lists
use super::{BipartiteNetwork, Edge, ReactantRole};
use thiserror::Error;

/// Reasons a network can fail the consistency check
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConsistencyError {
    #[error("Edge {0:?} references a compound missing from the network")]
    MissingCompound(Edge),
    #[error("Compound {compound} references reaction {reaction} which is missing from the network")]
    MissingReaction { compound: String, reaction: String },
    #[error("Compound of edge {0:?} is not declared on that side of its reaction")]
    CompoundNotOnSide(Edge),
    #[error("Edge {0:?} runs against the declared direction of an irreversible reaction")]
    ReverseEdgeOnIrreversible(Edge),
    #[error("{role:?} edge between {compound} and {reaction} is only recorded on one of its ends")]
    AdjacencyMismatch {
        compound: String,
        reaction: String,
        role: ReactantRole,
    },
}

impl BipartiteNetwork {
    /// Validate that every edge (c, r) has c on r's declared side matching the edge
    ///
    /// Reverse edges (a product consumed, or a substrate produced) are only valid on
    /// reversible reactions. Each edge must be recorded on both the compound and the reaction.
    /// Returns the first violation found, in insertion order.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        for reaction in self.reactions.values() {
            for edge in reaction.edges() {
                let Some(compound) = self.compounds.get(&edge.compound) else {
                    return Err(ConsistencyError::MissingCompound(edge));
                };
                let recorded = match edge.role {
                    ReactantRole::Substrate => compound.consumers.contains(&reaction.id),
                    ReactantRole::Product => compound.producers.contains(&reaction.id),
                };
                if !recorded {
                    return Err(ConsistencyError::AdjacencyMismatch {
                        compound: edge.compound,
                        reaction: edge.reaction,
                        role: edge.role,
                    });
                }
                if !reaction.side(edge.side).contains(&edge.compound) {
                    return Err(ConsistencyError::CompoundNotOnSide(edge));
                }
                if edge.is_reverse() && !reaction.reversible {
                    return Err(ConsistencyError::ReverseEdgeOnIrreversible(edge));
                }
            }
        }
        for compound in self.compounds.values() {
            let consumers = compound.consumers().map(|r| (r, ReactantRole::Substrate));
            let producers = compound.producers().map(|r| (r, ReactantRole::Product));
            for (id, role) in consumers.chain(producers) {
                let Some(reaction) = self.reactions.get(id) else {
                    return Err(ConsistencyError::MissingReaction {
                        compound: compound.id.clone(),
                        reaction: id.to_string(),
                    });
                };
                let ends = match role {
                    ReactantRole::Substrate => &reaction.inputs,
                    ReactantRole::Product => &reaction.outputs,
                };
                if !ends.iter().any(|(c, _)| *c == compound.id) {
                    return Err(ConsistencyError::AdjacencyMismatch {
                        compound: compound.id.clone(),
                        reaction: id.to_string(),
                        role,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }
}
