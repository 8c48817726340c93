//! Bipartite compound/reaction graph the scope expansion runs over
//!
//! Compounds and reactions are stored in two insertion ordered arenas keyed by id, so every
//! query below iterates in a deterministic order. Edges are typed by the role the compound
//! plays for the reaction ([`ReactantRole`]) and the declared side it sits on ([`Side`]).
pub mod consistency;
pub mod conversion;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use consistency::ConsistencyError;

/// A node of the bipartite network
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Compound(String),
    Reaction(String),
}

impl Node {
    /// Id of the compound or reaction this node refers to
    pub fn id(&self) -> &str {
        match self {
            Node::Compound(id) | Node::Reaction(id) => id,
        }
    }
}

/// Role a compound plays along an edge
///
/// A `Substrate` edge points from the compound to the reaction, a `Product` edge points from
/// the reaction to the compound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactantRole {
    Substrate,
    Product,
}

/// Declared stoichiometric side of a reaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The declared substrates
    Left,
    /// The declared products
    Right,
}

/// Edge between a compound and a reaction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub compound: String,
    pub reaction: String,
    pub role: ReactantRole,
    pub side: Side,
}

impl Edge {
    pub fn new(compound: &str, reaction: &str, role: ReactantRole, side: Side) -> Edge {
        Edge {
            compound: compound.to_string(),
            reaction: reaction.to_string(),
            role,
            side,
        }
    }

    pub fn source(&self) -> Node {
        match self.role {
            ReactantRole::Substrate => Node::Compound(self.compound.clone()),
            ReactantRole::Product => Node::Reaction(self.reaction.clone()),
        }
    }

    pub fn target(&self) -> Node {
        match self.role {
            ReactantRole::Substrate => Node::Reaction(self.reaction.clone()),
            ReactantRole::Product => Node::Compound(self.compound.clone()),
        }
    }

    /// Whether the edge runs against the declared direction of its reaction
    pub fn is_reverse(&self) -> bool {
        matches!(
            (self.role, self.side),
            (ReactantRole::Substrate, Side::Right) | (ReactantRole::Product, Side::Left)
        )
    }
}

/// Compound vertex
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompoundNode {
    /// Unique compound id
    pub id: String,
    /// Human readable name
    pub name: Option<String>,
    /// Reactions reached through a `Substrate` edge
    consumers: IndexSet<String>,
    /// Reactions with a `Product` edge into this compound
    producers: IndexSet<String>,
}

impl CompoundNode {
    pub fn new(id: &str) -> CompoundNode {
        CompoundNode {
            id: id.to_string(),
            name: None,
            consumers: IndexSet::new(),
            producers: IndexSet::new(),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> CompoundNode {
        self.name = name;
        self
    }

    /// Ids of reactions this compound is a graph predecessor of
    pub fn consumers(&self) -> impl Iterator<Item = &str> {
        self.consumers.iter().map(String::as_str)
    }

    /// Ids of reactions this compound is a graph successor of
    pub fn producers(&self) -> impl Iterator<Item = &str> {
        self.producers.iter().map(String::as_str)
    }
}

/// Reaction vertex
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReactionNode {
    /// Unique reaction id
    pub id: String,
    /// Human readable name
    pub name: Option<String>,
    /// Declared substrates (left side)
    pub substrates: Vec<String>,
    /// Declared products (right side)
    pub products: Vec<String>,
    /// Whether the reaction may also fire from its products to its substrates
    pub reversible: bool,
    /// Compounds with a `Substrate` edge into this reaction
    inputs: IndexSet<(String, Side)>,
    /// Compounds this reaction has a `Product` edge into
    outputs: IndexSet<(String, Side)>,
}

impl ReactionNode {
    pub fn new<S: AsRef<str>>(
        id: &str,
        substrates: &[S],
        products: &[S],
        reversible: bool,
    ) -> ReactionNode {
        ReactionNode {
            id: id.to_string(),
            name: None,
            substrates: substrates.iter().map(|s| s.as_ref().to_string()).collect(),
            products: products.iter().map(|s| s.as_ref().to_string()).collect(),
            reversible,
            inputs: IndexSet::new(),
            outputs: IndexSet::new(),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> ReactionNode {
        self.name = name;
        self
    }

    /// Declared compound list of one side
    pub fn side(&self, side: Side) -> &[String] {
        match side {
            Side::Left => &self.substrates,
            Side::Right => &self.products,
        }
    }

    /// Edges incident to this reaction, inputs first
    pub fn edges(&self) -> Vec<Edge> {
        let inputs = self
            .inputs
            .iter()
            .map(|(c, side)| Edge::new(c, &self.id, ReactantRole::Substrate, *side));
        let outputs = self
            .outputs
            .iter()
            .map(|(c, side)| Edge::new(c, &self.id, ReactantRole::Product, *side));
        inputs.chain(outputs).collect()
    }

    fn input_compounds(&self) -> IndexSet<&str> {
        self.inputs.iter().map(|(c, _)| c.as_str()).collect()
    }

    fn output_compounds(&self) -> IndexSet<&str> {
        self.outputs.iter().map(|(c, _)| c.as_str()).collect()
    }
}

/// Errors raised while building a network
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("Node {0:?} is not present in the network")]
    MissingNode(Node),
    #[error("Node {0:?} is already present in the network")]
    DuplicateNode(Node),
}

/// Directed bipartite graph of compounds and reactions
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BipartiteNetwork {
    compounds: IndexMap<String, CompoundNode>,
    reactions: IndexMap<String, ReactionNode>,
}

impl BipartiteNetwork {
    pub fn new() -> Self {
        BipartiteNetwork::default()
    }

    // region Construction
    /// Add a compound vertex
    pub fn add_compound(&mut self, mut compound: CompoundNode) -> Result<(), NetworkError> {
        if self.compounds.contains_key(&compound.id) {
            return Err(NetworkError::DuplicateNode(Node::Compound(compound.id)));
        }
        compound.consumers.clear();
        compound.producers.clear();
        self.compounds.insert(compound.id.clone(), compound);
        Ok(())
    }

    /// Add a reaction vertex without any edges
    pub fn add_reaction(&mut self, mut reaction: ReactionNode) -> Result<(), NetworkError> {
        if self.reactions.contains_key(&reaction.id) {
            return Err(NetworkError::DuplicateNode(Node::Reaction(reaction.id)));
        }
        reaction.inputs.clear();
        reaction.outputs.clear();
        self.reactions.insert(reaction.id.clone(), reaction);
        Ok(())
    }

    /// Add an edge between two existing vertices
    ///
    /// # Note:
    /// Whether the edge agrees with the reaction's declared sides is not checked here, see
    /// [`BipartiteNetwork::check_consistency`].
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), NetworkError> {
        let compound = self
            .compounds
            .get_mut(&edge.compound)
            .ok_or_else(|| NetworkError::MissingNode(Node::Compound(edge.compound.clone())))?;
        let reaction = self
            .reactions
            .get_mut(&edge.reaction)
            .ok_or_else(|| NetworkError::MissingNode(Node::Reaction(edge.reaction.clone())))?;
        match edge.role {
            ReactantRole::Substrate => {
                compound.consumers.insert(edge.reaction);
                reaction.inputs.insert((edge.compound, edge.side));
            }
            ReactantRole::Product => {
                compound.producers.insert(edge.reaction);
                reaction.outputs.insert((edge.compound, edge.side));
            }
        }
        Ok(())
    }

    /// Add a reaction together with all of its edges, creating missing compounds
    ///
    /// Every substrate gets a `Substrate` edge and every product a `Product` edge. Reversible
    /// reactions also get the reverse edges (products as `Substrate`, substrates as `Product`).
    pub fn insert_reaction(&mut self, reaction: ReactionNode) -> Result<(), NetworkError> {
        let id = reaction.id.clone();
        let reversible = reaction.reversible;
        let substrates = reaction.substrates.clone();
        let products = reaction.products.clone();
        self.add_reaction(reaction)?;
        for c in substrates.iter().chain(products.iter()) {
            if !self.compounds.contains_key(c) {
                self.add_compound(CompoundNode::new(c))?;
            }
        }
        for c in &substrates {
            self.add_edge(Edge::new(c, &id, ReactantRole::Substrate, Side::Left))?;
        }
        for c in &products {
            self.add_edge(Edge::new(c, &id, ReactantRole::Product, Side::Right))?;
        }
        if reversible {
            for c in &products {
                self.add_edge(Edge::new(c, &id, ReactantRole::Substrate, Side::Right))?;
            }
            for c in &substrates {
                self.add_edge(Edge::new(c, &id, ReactantRole::Product, Side::Left))?;
            }
        }
        Ok(())
    }

    /// Remove a compound and all of its edges
    pub fn remove_compound(&mut self, id: &str) -> Option<CompoundNode> {
        let compound = self.compounds.shift_remove(id)?;
        for r in compound.consumers.iter() {
            if let Some(reaction) = self.reactions.get_mut(r) {
                reaction.inputs.retain(|(c, _)| c != id);
            }
        }
        for r in compound.producers.iter() {
            if let Some(reaction) = self.reactions.get_mut(r) {
                reaction.outputs.retain(|(c, _)| c != id);
            }
        }
        Some(compound)
    }

    /// Remove a reaction and all of its edges
    pub fn remove_reaction(&mut self, id: &str) -> Option<ReactionNode> {
        let reaction = self.reactions.shift_remove(id)?;
        for (c, _) in reaction.inputs.iter() {
            if let Some(compound) = self.compounds.get_mut(c) {
                compound.consumers.shift_remove(id);
            }
        }
        for (c, _) in reaction.outputs.iter() {
            if let Some(compound) = self.compounds.get_mut(c) {
                compound.producers.shift_remove(id);
            }
        }
        Some(reaction)
    }

    /// Remove a node of either kind, returns whether something was removed
    pub fn remove_node(&mut self, node: &Node) -> bool {
        match node {
            Node::Compound(id) => self.remove_compound(id).is_some(),
            Node::Reaction(id) => self.remove_reaction(id).is_some(),
        }
    }
    // endregion Construction

    // region Queries
    pub fn contains(&self, node: &Node) -> bool {
        match node {
            Node::Compound(id) => self.compounds.contains_key(id),
            Node::Reaction(id) => self.reactions.contains_key(id),
        }
    }

    pub fn contains_compound(&self, id: &str) -> bool {
        self.compounds.contains_key(id)
    }

    pub fn contains_reaction(&self, id: &str) -> bool {
        self.reactions.contains_key(id)
    }

    pub fn compound(&self, id: &str) -> Option<&CompoundNode> {
        self.compounds.get(id)
    }

    pub fn reaction(&self, id: &str) -> Option<&ReactionNode> {
        self.reactions.get(id)
    }

    pub fn compounds(&self) -> impl Iterator<Item = &CompoundNode> {
        self.compounds.values()
    }

    pub fn reactions(&self) -> impl Iterator<Item = &ReactionNode> {
        self.reactions.values()
    }

    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// All nodes, compounds first
    pub fn nodes(&self) -> Vec<Node> {
        self.compounds
            .keys()
            .map(|id| Node::Compound(id.clone()))
            .chain(self.reactions.keys().map(|id| Node::Reaction(id.clone())))
            .collect()
    }

    /// Edges incident to a reaction, empty if the reaction is unknown
    pub fn edges_of(&self, reaction: &str) -> Vec<Edge> {
        self.reactions
            .get(reaction)
            .map(ReactionNode::edges)
            .unwrap_or_default()
    }

    /// Every edge in the network
    pub fn edges(&self) -> Vec<Edge> {
        self.reactions.values().flat_map(ReactionNode::edges).collect()
    }

    /// Nodes this node has an outgoing edge to
    pub fn successors_of(&self, node: &Node) -> Vec<Node> {
        match node {
            Node::Compound(id) => self
                .compounds
                .get(id)
                .map(|c| c.consumers().map(|r| Node::Reaction(r.to_string())).collect())
                .unwrap_or_default(),
            Node::Reaction(id) => self
                .reactions
                .get(id)
                .map(|r| {
                    r.output_compounds()
                        .into_iter()
                        .map(|c| Node::Compound(c.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Nodes with an edge into this node
    pub fn predecessors_of(&self, node: &Node) -> Vec<Node> {
        match node {
            Node::Compound(id) => self
                .compounds
                .get(id)
                .map(|c| c.producers().map(|r| Node::Reaction(r.to_string())).collect())
                .unwrap_or_default(),
            Node::Reaction(id) => self
                .reactions
                .get(id)
                .map(|r| {
                    r.input_compounds()
                        .into_iter()
                        .map(|c| Node::Compound(c.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Nodes connected to this node in either direction, successors first
    pub fn neighbors_of(&self, node: &Node) -> Vec<Node> {
        let mut neighbors: IndexSet<Node> = self.successors_of(node).into_iter().collect();
        neighbors.extend(self.predecessors_of(node));
        neighbors.into_iter().collect()
    }

    pub fn out_degree(&self, node: &Node) -> usize {
        match node {
            Node::Compound(id) => self.compounds.get(id).map_or(0, |c| c.consumers.len()),
            Node::Reaction(id) => self
                .reactions
                .get(id)
                .map_or(0, |r| r.output_compounds().len()),
        }
    }

    pub fn in_degree(&self, node: &Node) -> usize {
        match node {
            Node::Compound(id) => self.compounds.get(id).map_or(0, |c| c.producers.len()),
            Node::Reaction(id) => self
                .reactions
                .get(id)
                .map_or(0, |r| r.input_compounds().len()),
        }
    }
    // endregion Queries
}
