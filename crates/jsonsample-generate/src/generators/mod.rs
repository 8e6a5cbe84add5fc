//! Fake value generators.
//!
//! Every generator has a stable id and produces one literal per call from the
//! caller's random source. The registry also owns the key heuristics that pick
//! a generator for a field.

pub mod primitives;
pub mod semantic;

use std::collections::BTreeMap;

use rand::RngCore;

use jsonsample_core::ScalarKind;

use crate::value::LiteralValue;

pub trait Generator {
    fn id(&self) -> &'static str;

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue;
}

pub struct GeneratorRegistry {
    generators: BTreeMap<&'static str, Box<dyn Generator>>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    /// Registry with every built-in generator.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        primitives::register(&mut registry);
        semantic::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.id(), generator);
    }

    pub fn generator(&self, id: &str) -> Option<&dyn Generator> {
        self.generators.get(id).map(|generator| generator.as_ref())
    }

    /// Registered ids, sorted.
    pub fn generator_ids(&self) -> Vec<&'static str> {
        self.generators.keys().copied().collect()
    }

    /// Id of the generator used for a field of `kind` rendered under `key`.
    pub fn select(&self, kind: ScalarKind, key: &str) -> &'static str {
        match kind {
            ScalarKind::Int => primitives::INT,
            ScalarKind::Float => primitives::FLOAT,
            ScalarKind::Bool => primitives::BOOL,
            ScalarKind::String => semantic::select_for_key(key),
        }
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generator_ids())
            .finish()
    }
}
