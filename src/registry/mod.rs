//! Identity registry of entries already present in the store
//!
//! Tracks two presence sets:
//! - registrant -> model names, for the model sheet
//! - registrant -> model -> component kinds, for the component sheet
//!
//! The registry is owned by a single synchronizer and is never shared across
//! threads.

use std::collections::{HashMap, HashSet};

use crate::domain::Snapshot;

/// Presence registry keyed by registrant, model and component kind
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    models: HashMap<String, HashSet<String>>,
    components: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry already seeded from `snapshot`
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut registry = Self::new();
        registry.seed(snapshot);
        registry
    }

    /// Replace all state with the entries of `snapshot`.
    ///
    /// Every model in the snapshot counts as present in the model sheet.
    pub fn seed(&mut self, snapshot: &Snapshot) {
        self.models.clear();
        self.components.clear();

        for (registrant, models) in &snapshot.0 {
            for (model, components) in models {
                self.mark_model(registrant, model);
                self.ensure_component_set(registrant, model);
                for component in components {
                    self.mark_component(registrant, model, &component.kind);
                }
            }
        }
    }

    /// Whether any model of `registrant` has been recorded
    pub fn has_registrant(&self, registrant: &str) -> bool {
        self.models.contains_key(registrant)
    }

    #[allow(dead_code)] // used in tests
    pub fn has_model(&self, registrant: &str, model: &str) -> bool {
        self.models
            .get(registrant)
            .is_some_and(|models| models.contains(model))
    }

    /// Whether a component set exists for the model, even an empty one
    #[allow(dead_code)] // used in tests
    pub fn has_component_set(&self, registrant: &str, model: &str) -> bool {
        self.components
            .get(registrant)
            .is_some_and(|models| models.contains_key(model))
    }

    /// False when the registrant or model is unknown
    #[allow(dead_code)] // used in tests
    pub fn has_component(&self, registrant: &str, model: &str, kind: &str) -> bool {
        self.components
            .get(registrant)
            .and_then(|models| models.get(model))
            .is_some_and(|kinds| kinds.contains(kind))
    }

    /// Record the registrant without recording any model under it
    pub fn mark_registrant(&mut self, registrant: &str) {
        self.models.entry(registrant.to_string()).or_default();
    }

    pub fn mark_model(&mut self, registrant: &str, model: &str) {
        self.models
            .entry(registrant.to_string())
            .or_default()
            .insert(model.to_string());
    }

    /// Create an empty component set for the model.
    ///
    /// Returns `true` if the set did not exist before.
    pub fn ensure_component_set(&mut self, registrant: &str, model: &str) -> bool {
        let models = self.components.entry(registrant.to_string()).or_default();
        if models.contains_key(model) {
            return false;
        }
        models.insert(model.to_string(), HashSet::new());
        true
    }

    /// Record a component kind.
    ///
    /// Returns `true` if the kind was not present before.
    pub fn mark_component(&mut self, registrant: &str, model: &str, kind: &str) -> bool {
        self.components
            .entry(registrant.to_string())
            .or_default()
            .entry(model.to_string())
            .or_default()
            .insert(kind.to_string())
    }

    /// Number of (registrant, model) pairs recorded for the model sheet
    pub fn model_count(&self) -> usize {
        self.models.values().map(HashSet::len).sum()
    }

    /// Number of (registrant, model, kind) triples recorded
    pub fn component_count(&self) -> usize {
        self.components
            .values()
            .flat_map(HashMap::values)
            .map(HashSet::len)
            .sum()
    }
}
