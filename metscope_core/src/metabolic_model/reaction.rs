//! This module provides a struct for representing reactions
use crate::configuration::CONFIGURATION;
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Negative coefficients mark substrates, positive coefficients mark products
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
}

impl Reaction {
    /// Whether the bounds allow flux in both directions
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0f64 && self.upper_bound > 0f64
    }

    /// Whether the bounds only allow the reaction to run backwards
    fn is_reverse_only(&self) -> bool {
        self.lower_bound < 0f64 && self.upper_bound <= 0f64
    }

    /// Ids of the metabolites this reaction consumes when running in its usable direction
    ///
    /// # Note:
    /// For a reaction which can only carry negative flux this is the set of metabolites with a
    /// positive coefficient.
    pub fn substrates(&self) -> Vec<String> {
        if self.is_reverse_only() {
            self.with_coefficient(|c| c > 0f64)
        } else {
            self.with_coefficient(|c| c < 0f64)
        }
    }

    /// Ids of the metabolites this reaction produces when running in its usable direction
    pub fn products(&self) -> Vec<String> {
        if self.is_reverse_only() {
            self.with_coefficient(|c| c < 0f64)
        } else {
            self.with_coefficient(|c| c > 0f64)
        }
    }

    fn with_coefficient<F: Fn(f64) -> bool>(&self, keep: F) -> Vec<String> {
        self.metabolites
            .iter()
            .filter(|&(_, &coefficient)| keep(coefficient))
            .map(|(id, _)| id.clone())
            .collect()
    }
}
