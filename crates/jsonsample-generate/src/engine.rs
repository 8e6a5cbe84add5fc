use std::any::Any;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use jsonsample_core::{extract_declarations, name_fields};

use crate::errors::SynthesisError;
use crate::generators::GeneratorRegistry;
use crate::model::{RenderedDeclaration, SynthesisOptions, SynthesisReport};
use crate::render::{Renderer, render_document};
use crate::resolver::Resolver;

/// Result of a synthesis run.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// One block per top-level declaration, in source order.
    pub declarations: Vec<RenderedDeclaration>,
    pub report: SynthesisReport,
}

impl SynthesisResult {
    /// All blocks joined into one printable document.
    pub fn document(&self) -> String {
        render_document(&self.declarations)
    }
}

/// Entry point for turning declaration source into sample documents.
#[derive(Debug, Clone, Default)]
pub struct SynthesisEngine {
    options: SynthesisOptions,
}

impl SynthesisEngine {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, source: &str) -> Result<SynthesisResult, SynthesisError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let mut report = SynthesisReport::new(run_id, seed);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
            || -> Result<Vec<RenderedDeclaration>, SynthesisError> {
                let mut declarations = extract_declarations(source)?;
                let names = name_fields(&mut declarations)?;
                let registry = GeneratorRegistry::new();
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let renderer = Renderer::with_indent(self.options.indent.clone());

                let mut resolver =
                    Resolver::new(&declarations, &names, &registry, &mut rng, &mut report);
                let mut rendered = Vec::new();
                for declaration in declarations.top_level() {
                    let node = resolver.resolve(&declaration.name)?.ok_or_else(|| {
                        SynthesisError::Resolution(format!(
                            "declaration '{}' vanished during synthesis",
                            declaration.name
                        ))
                    })?;
                    rendered.push(RenderedDeclaration {
                        name: declaration.name.clone(),
                        text: renderer.render(&node, 0),
                    });
                }
                Ok(rendered)
            },
        ));

        let declarations = match outcome {
            Ok(result) => result?,
            Err(panic) => {
                return Err(SynthesisError::Resolution(format!(
                    "panic during synthesis: {}",
                    panic_message(panic)
                )));
            }
        };

        report.duration_ms = start.elapsed().as_millis() as u64;

        Ok(SynthesisResult {
            declarations,
            report,
        })
    }
}

/// Synthesizes every top-level declaration of `source` with default options.
pub fn synthesize(source: &str) -> Result<Vec<RenderedDeclaration>, SynthesisError> {
    SynthesisEngine::default()
        .run(source)
        .map(|result| result.declarations)
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SynthesisEngine {
        SynthesisEngine::new(SynthesisOptions {
            seed: Some(seed),
            ..SynthesisOptions::default()
        })
    }

    #[test]
    fn report_records_seed_and_usage() {
        let result = seeded(11)
            .run("type A struct { Email string; Count int; hidden bool }")
            .expect("run");
        assert_eq!(result.report.seed, 11);
        assert_eq!(result.report.generator_usage.get("semantic.email"), Some(&1));
        assert_eq!(result.report.generator_usage.get("primitive.int"), Some(&1));
        let counts = result.report.declaration("A").expect("counts");
        assert_eq!(counts.fields_synthesized, 2);
        assert_eq!(counts.fields_excluded, 1);
    }

    #[test]
    fn drawn_seed_is_recorded_and_replays() {
        let source = "type A struct { Name string; Age int }";
        let first = SynthesisEngine::default().run(source).expect("run");
        let replay = seeded(first.report.seed).run(source).expect("run");
        assert_eq!(first.declarations, replay.declarations);
    }

    #[test]
    fn document_joins_blocks() {
        let result = seeded(3)
            .run("type A struct {}\ntype B struct { x int }")
            .expect("run");
        assert_eq!(result.document(), "// A\n{}\n\n// B\n{}");
    }

    #[test]
    fn panic_message_downcasts_strings() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("bang".to_string())), "bang");
        assert_eq!(panic_message(Box::new(5_u8)), "unknown panic");
    }
}
