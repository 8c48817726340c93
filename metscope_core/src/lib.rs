//! Core rust implementation of metabolic scope computation over compound/reaction networks.

pub mod configuration;
pub mod metabolic_model;
pub mod network;
pub mod scope;
