//! Fixed point expansion of the reachable compounds and reactions
use tracing::debug;

use super::availability::{is_available, Direction};
use super::state::ExpansionState;
use super::{ScopeError, ScopeOptions};
use crate::network::{BipartiteNetwork, CompoundNode, ReactionNode};

/// A reaction fired by one expansion step
#[derive(Clone, Debug)]
pub struct FiredReaction<'a> {
    pub reaction: &'a ReactionNode,
    pub direction: Direction,
    /// Step opened by this reaction
    pub step: usize,
    /// Compounds first reached through this reaction
    pub produced: Vec<&'a str>,
}

/// Expansion engine over a read-only network
///
/// Each call to [`Expansion::step`] fires the next available reaction from the queue,
/// discarding unavailable ones on the way, until the queue runs dry.
pub struct Expansion<'a> {
    network: &'a BipartiteNetwork,
    options: &'a ScopeOptions,
    state: ExpansionState<'a>,
}

impl<'a> Expansion<'a> {
    /// Validate the inputs and seed the expansion
    ///
    /// # Errors
    /// - [`ScopeError::Configuration`] if the options reference unknown ids or a compound is
    ///   both seed and bootstrap
    /// - [`ScopeError::Consistency`] if the network's edges disagree with its reactions
    pub fn new(
        network: &'a BipartiteNetwork,
        options: &'a ScopeOptions,
    ) -> Result<Expansion<'a>, ScopeError> {
        options.validate(network)?;
        network.check_consistency()?;
        let mut expansion = Expansion {
            network,
            options,
            state: ExpansionState::new(options.trace),
        };
        expansion.initialize();
        Ok(expansion)
    }

    fn initialize(&mut self) {
        let network = self.network;
        let seeds: Vec<&'a CompoundNode> = self
            .options
            .seeds
            .iter()
            .filter_map(|id| network.compound(id))
            .collect();
        let bootstraps: Vec<&'a CompoundNode> = self
            .options
            .bootstraps
            .iter()
            .filter_map(|id| network.compound(id))
            .collect();
        for compound in seeds.iter().chain(bootstraps.iter()).copied() {
            self.state.visit_compound(&compound.id);
        }
        for compound in seeds {
            self.enqueue_consumers(compound);
        }
        if self.options.expand_through_bootstraps {
            for compound in bootstraps {
                self.enqueue_consumers(compound);
            }
        }
        debug!(
            visited = self.state.visited_compounds().len(),
            queued = self.state.queue_len(),
            "initialized expansion"
        );
    }

    /// Queue every reaction the compound could be consumed by
    ///
    /// Irreversible reactions are only reached through an outgoing edge of the compound,
    /// reversible ones through an edge in either direction.
    fn enqueue_consumers(&mut self, compound: &'a CompoundNode) {
        let network = self.network;
        let reversible_producers = compound
            .producers()
            .filter(|r| network.reaction(r).is_some_and(|rxn| rxn.reversible));
        for reaction in compound.consumers().chain(reversible_producers) {
            if self.options.avoided_reactions.contains(reaction) {
                continue;
            }
            self.state.enqueue(reaction);
        }
    }

    /// Fire the next available reaction, `None` once the queue is exhausted
    pub fn step(&mut self) -> Option<FiredReaction<'a>> {
        let network = self.network;
        while let Some(id) = self.state.pop() {
            let Some(reaction) = network.reaction(id) else {
                continue;
            };
            match is_available(reaction, self.state.visited_compounds()) {
                Some(direction) => return Some(self.fire(reaction, direction)),
                None => debug!(reaction = id, "discarded unavailable reaction"),
            }
        }
        None
    }

    fn fire(&mut self, reaction: &'a ReactionNode, direction: Direction) -> FiredReaction<'a> {
        let step = self.state.fire_reaction(&reaction.id, direction);
        let produced: Vec<&'a str> = direction
            .produced(reaction)
            .iter()
            .map(String::as_str)
            .filter(|&c| self.state.visit_compound(c))
            .collect();
        let network = self.network;
        for c in &produced {
            if let Some(compound) = network.compound(c) {
                self.enqueue_consumers(compound);
            }
        }
        debug!(
            reaction = %reaction.id,
            ?direction,
            step,
            produced = produced.len(),
            "fired reaction"
        );
        FiredReaction {
            reaction,
            direction,
            step,
            produced,
        }
    }

    /// Whether a non-empty target set has been fully reached
    pub fn targets_reached(&self) -> bool {
        !self.options.targets.is_empty()
            && self
                .options
                .targets
                .iter()
                .all(|t| self.state.is_compound_visited(t))
    }

    pub fn state(&self) -> &ExpansionState<'a> {
        &self.state
    }

    pub fn into_state(self) -> ExpansionState<'a> {
        self.state
    }
}

impl<'a> Iterator for Expansion<'a> {
    type Item = FiredReaction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}
