//! Bookkeeping owned by a single scope expansion
use std::collections::{HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::availability::Direction;
use crate::network::Node;

/// Step at which each node was first visited
///
/// Seeds and bootstraps are at step 0, each fired reaction opens a new step shared by the
/// compounds it produced first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpansionTrace {
    #[serde(with = "indexmap::map::serde_seq")]
    steps: IndexMap<Node, usize>,
}

impl ExpansionTrace {
    /// Record a node, keeping the first step it was seen at
    pub fn record(&mut self, node: Node, step: usize) {
        self.steps.entry(node).or_insert(step);
    }

    pub fn step_of(&self, node: &Node) -> Option<usize> {
        self.steps.get(node).copied()
    }

    /// Nodes first visited at `step`, in visiting order
    pub fn nodes_at(&self, step: usize) -> Vec<&Node> {
        self.steps
            .iter()
            .filter(|&(_, &s)| s == step)
            .map(|(node, _)| node)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, usize)> {
        self.steps.iter().map(|(node, step)| (node, *step))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Mutable state of one expansion, borrowing ids from the network being expanded
#[derive(Clone, Debug)]
pub struct ExpansionState<'a> {
    visited_compounds: IndexSet<&'a str>,
    visited_reactions: IndexMap<&'a str, Direction>,
    queue: VecDeque<&'a str>,
    queued: HashSet<&'a str>,
    step: usize,
    trace: Option<ExpansionTrace>,
}

impl<'a> ExpansionState<'a> {
    pub fn new(trace: bool) -> Self {
        ExpansionState {
            visited_compounds: IndexSet::new(),
            visited_reactions: IndexMap::new(),
            queue: VecDeque::new(),
            queued: HashSet::new(),
            step: 0,
            trace: trace.then(ExpansionTrace::default),
        }
    }

    /// Mark a compound visited at the current step, returns false if it already was
    pub fn visit_compound(&mut self, compound: &'a str) -> bool {
        if !self.visited_compounds.insert(compound) {
            return false;
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.record(Node::Compound(compound.to_string()), self.step);
        }
        true
    }

    /// Record a reaction as fired, opening a new step, returns that step
    pub fn fire_reaction(&mut self, reaction: &'a str, direction: Direction) -> usize {
        self.step += 1;
        self.visited_reactions.insert(reaction, direction);
        if let Some(trace) = self.trace.as_mut() {
            trace.record(Node::Reaction(reaction.to_string()), self.step);
        }
        self.step
    }

    /// Push a reaction to the back of the queue unless it already fired or is waiting
    pub fn enqueue(&mut self, reaction: &'a str) -> bool {
        if self.visited_reactions.contains_key(reaction) || !self.queued.insert(reaction) {
            return false;
        }
        self.queue.push_back(reaction);
        true
    }

    pub fn pop(&mut self) -> Option<&'a str> {
        let reaction = self.queue.pop_front()?;
        self.queued.remove(reaction);
        Some(reaction)
    }

    pub fn visited_compounds(&self) -> &IndexSet<&'a str> {
        &self.visited_compounds
    }

    /// Fired reactions with the direction they fired in, in firing order
    pub fn visited_reactions(&self) -> &IndexMap<&'a str, Direction> {
        &self.visited_reactions
    }

    pub fn is_compound_visited(&self, compound: &str) -> bool {
        self.visited_compounds.contains(compound)
    }

    pub fn is_reaction_fired(&self, reaction: &str) -> bool {
        self.visited_reactions.contains_key(reaction)
    }

    pub fn is_queued(&self, reaction: &str) -> bool {
        self.queued.contains(reaction)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn trace(&self) -> Option<&ExpansionTrace> {
        self.trace.as_ref()
    }

    pub fn into_trace(self) -> Option<ExpansionTrace> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo_and_deduplicated() {
        let mut state = ExpansionState::new(false);
        assert!(state.enqueue("R1"));
        assert!(state.enqueue("R2"));
        assert!(!state.enqueue("R1"));
        assert_eq!(state.queue_len(), 2);
        assert_eq!(state.pop(), Some("R1"));
        assert!(!state.is_queued("R1"));
        // a discarded reaction can be queued again
        assert!(state.enqueue("R1"));
        assert_eq!(state.pop(), Some("R2"));
        assert_eq!(state.pop(), Some("R1"));
        assert_eq!(state.pop(), None);
    }

    #[test]
    fn fired_reactions_are_not_requeued() {
        let mut state = ExpansionState::new(false);
        state.fire_reaction("R1", Direction::Forward);
        assert!(!state.enqueue("R1"));
        assert!(state.is_reaction_fired("R1"));
    }

    #[test]
    fn trace_keeps_first_step() {
        let mut state = ExpansionState::new(true);
        assert!(state.visit_compound("A"));
        assert_eq!(state.fire_reaction("R1", Direction::Forward), 1);
        assert!(state.visit_compound("B"));
        assert!(!state.visit_compound("A"));
        let trace = state.trace().unwrap();
        assert_eq!(trace.step_of(&Node::Compound("A".to_string())), Some(0));
        assert_eq!(trace.step_of(&Node::Compound("B".to_string())), Some(1));
        assert_eq!(trace.step_of(&Node::Reaction("R1".to_string())), Some(1));
        assert_eq!(trace.nodes_at(1).len(), 2);
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn no_trace_unless_requested() {
        let mut state = ExpansionState::new(false);
        state.visit_compound("A");
        assert!(state.trace().is_none());
        assert!(state.into_trace().is_none());
    }
}
