//! This module provides the Model struct for representing an entire metabolic model
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

use indexmap::IndexMap;

/// Represents a Genome Scale Metabolic Model, reduced to what scope computation reads
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Id associated with the Model
    pub id: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            metabolites: IndexMap::new(),
            id: None,
        }
    }

    /// Add a reaction to the model
    ///
    /// Metabolites referenced by the reaction but missing from the model are added with only
    /// their id set.
    ///
    /// # Examples
    /// ```rust
    /// use metscope_core::metabolic_model::model::Model;
    /// use metscope_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        for met in reaction.metabolites.keys() {
            if !self.metabolites.contains_key(met) {
                self.metabolites
                    .insert(met.clone(), Metabolite::new(met));
            }
        }
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a metabolite to the model
    ///
    /// # Examples
    /// ```rust
    /// use metscope_core::metabolic_model::metabolite::MetaboliteBuilder;
    /// use metscope_core::metabolic_model::model::Model;
    /// let mut model = Model::new_empty();
    /// let new_metabolite = MetaboliteBuilder::default().id("h2o_c".to_string()).build().unwrap();
    /// model.add_metabolite(new_metabolite);
    /// ```
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }
}
