//! Conversion of a stoichiometric [`Model`] into a [`BipartiteNetwork`]
use super::{BipartiteNetwork, CompoundNode, NetworkError, ReactionNode};
use crate::metabolic_model::model::Model;

impl TryFrom<&Model> for BipartiteNetwork {
    type Error = NetworkError;

    /// Every metabolite becomes a compound node, every reaction a reaction node with its
    /// substrate and product edges (and reverse edges when the bounds allow both directions)
    fn try_from(model: &Model) -> Result<Self, Self::Error> {
        let mut network = BipartiteNetwork::new();
        for met in model.metabolites.values() {
            network.add_compound(CompoundNode::new(&met.id).with_name(met.name.clone()))?;
        }
        for rxn in model.reactions.values() {
            let node = ReactionNode::new(
                &rxn.id,
                &rxn.substrates(),
                &rxn.products(),
                rxn.is_reversible(),
            )
            .with_name(rxn.name.clone());
            network.insert_reaction(node)?;
        }
        Ok(network)
    }
}

impl Model {
    /// Build the bipartite compound/reaction network of this model
    pub fn to_network(&self) -> Result<BipartiteNetwork, NetworkError> {
        BipartiteNetwork::try_from(self)
    }
}
