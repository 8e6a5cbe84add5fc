use rand::{Rng, RngCore};

use crate::generators::{Generator, GeneratorRegistry};
use crate::value::LiteralValue;

pub const INT: &str = "primitive.int";
pub const FLOAT: &str = "primitive.float";
pub const BOOL: &str = "primitive.bool";

const FLOAT_MAX: f64 = 10_000.0;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(IntGenerator));
    registry.register_generator(Box::new(FloatGenerator));
    registry.register_generator(Box::new(BoolGenerator));
}

struct IntGenerator;

impl Generator for IntGenerator {
    fn id(&self) -> &'static str {
        INT
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        LiteralValue::Int(rng.random_range(0..=i64::MAX))
    }
}

struct FloatGenerator;

impl Generator for FloatGenerator {
    fn id(&self) -> &'static str {
        FLOAT
    }

    fn generate(&self, rng: &mut dyn RngCore) -> LiteralValue {
        let value: f64 = rng.random_range(0.0..FLOAT_MAX);
        LiteralValue::Float((value * 100.0).round() / 100.0)
    }
}

/// Booleans are not randomized: every bool field renders `true`.
struct BoolGenerator;

impl Generator for BoolGenerator {
    fn id(&self) -> &'static str {
        BOOL
    }

    fn generate(&self, _rng: &mut dyn RngCore) -> LiteralValue {
        LiteralValue::Bool(true)
    }
}
