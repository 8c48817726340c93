//! Rule deciding whether a reaction can fire given the compounds reached so far
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::network::ReactionNode;

/// Direction a reaction fired in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Declared substrates consumed, declared products produced
    Forward,
    /// Declared products consumed, declared substrates produced
    Reverse,
}

impl Direction {
    /// Compounds consumed when firing in this direction
    pub fn consumed(self, reaction: &ReactionNode) -> &[String] {
        match self {
            Direction::Forward => &reaction.substrates,
            Direction::Reverse => &reaction.products,
        }
    }

    /// Compounds produced when firing in this direction
    pub fn produced(self, reaction: &ReactionNode) -> &[String] {
        match self {
            Direction::Forward => &reaction.products,
            Direction::Reverse => &reaction.substrates,
        }
    }
}

/// Direction the reaction can fire in with every consumed compound already visited
///
/// The forward direction wins when both sides are fully visited. A side with no compounds is
/// trivially satisfied. Returns `None` if the reaction is unavailable.
pub fn is_available(reaction: &ReactionNode, visited: &IndexSet<&str>) -> Option<Direction> {
    let satisfied = |direction: Direction| {
        direction
            .consumed(reaction)
            .iter()
            .all(|c| visited.contains(c.as_str()))
    };
    if satisfied(Direction::Forward) {
        Some(Direction::Forward)
    } else if reaction.reversible && satisfied(Direction::Reverse) {
        Some(Direction::Reverse)
    } else {
        None
    }
}
