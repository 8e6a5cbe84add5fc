//! Type resolver and value synthesizer.
//!
//! Turns a declaration into a [`ValueNode`] tree. Declarations are memoized
//! by name for the lifetime of one [`Resolver`]: a name is synthesized at most
//! once and every later reference shares the same node. A placeholder is
//! stored before the fields are visited, so a declaration that reaches itself
//! again (directly or through others) gets a [`ValueNode::Reference`] instead
//! of recursing forever.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use rand::RngCore;

use jsonsample_core::{
    DeclarationSet, FieldDeclaration, FieldNames, FieldSlot, ScalarKind, TypeDeclaration,
    TypeRef, name_field,
};

use crate::errors::SynthesisError;
use crate::generators::GeneratorRegistry;
use crate::model::{DeclarationReport, SynthesisIssue, SynthesisReport};
use crate::value::ValueNode;

/// Elements generated for an array of scalars.
pub const SCALAR_ARRAY_LEN: usize = 5;
/// Elements (all the same node) generated for an array of records.
pub const RECORD_ARRAY_LEN: usize = 2;
/// Deepest chain of nested field types resolved before giving up.
pub const MAX_NESTING: usize = 64;

enum MemoSlot {
    Pending,
    Done(Rc<ValueNode>),
}

pub struct Resolver<'a> {
    declarations: &'a DeclarationSet,
    names: &'a FieldNames,
    registry: &'a GeneratorRegistry,
    rng: &'a mut dyn RngCore,
    report: &'a mut SynthesisReport,
    memo: HashMap<String, MemoSlot>,
    depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(
        declarations: &'a DeclarationSet,
        names: &'a FieldNames,
        registry: &'a GeneratorRegistry,
        rng: &'a mut dyn RngCore,
        report: &'a mut SynthesisReport,
    ) -> Self {
        Self {
            declarations,
            names,
            registry,
            rng,
            report,
            memo: HashMap::new(),
            depth: 0,
        }
    }

    /// Value of the declaration called `name`, `None` if it is unknown.
    pub fn resolve(&mut self, name: &str) -> Result<Option<Rc<ValueNode>>, SynthesisError> {
        match self.memo.get(name) {
            Some(MemoSlot::Done(node)) => return Ok(Some(Rc::clone(node))),
            Some(MemoSlot::Pending) => {
                return Ok(Some(Rc::new(ValueNode::Reference {
                    target: name.to_string(),
                })));
            }
            None => {}
        }

        let declarations = self.declarations;
        let Some(declaration) = declarations.get(name) else {
            return Ok(None);
        };

        self.memo.insert(name.to_string(), MemoSlot::Pending);
        let node = Rc::new(self.synthesize_object(declaration)?);
        self.memo
            .insert(name.to_string(), MemoSlot::Done(Rc::clone(&node)));
        Ok(Some(node))
    }

    fn synthesize_object(
        &mut self,
        declaration: &'a TypeDeclaration,
    ) -> Result<ValueNode, SynthesisError> {
        let registered = self.declarations.contains(&declaration.name);
        let mut children = IndexMap::new();
        let mut counts = DeclarationReport {
            name: declaration.name.clone(),
            fields_synthesized: 0,
            fields_excluded: 0,
            fields_omitted: 0,
        };

        for (index, field) in declaration.fields.iter().enumerate() {
            let slot = match self.names.slot(&declaration.name, index) {
                Some(slot) => slot.clone(),
                None if !registered => name_field(field)?,
                None => {
                    return Err(SynthesisError::Resolution(format!(
                        "field {} of '{}' has no output key",
                        index, declaration.name
                    )));
                }
            };
            let key = match slot {
                FieldSlot::Excluded => {
                    counts.fields_excluded += 1;
                    continue;
                }
                FieldSlot::Key(key) => key,
            };

            match self.resolve_type(&declaration.name, &key, &field.type_ref)? {
                Some(node) => {
                    counts.fields_synthesized += 1;
                    children.insert(key, node);
                }
                None => {
                    counts.fields_omitted += 1;
                    self.record_omitted(declaration, field, &key);
                }
            }
        }

        self.report.record_declaration(counts);
        Ok(ValueNode::Object {
            source_name: declaration.name.clone(),
            children,
        })
    }

    fn resolve_type(
        &mut self,
        owner: &str,
        key: &str,
        type_ref: &'a TypeRef,
    ) -> Result<Option<Rc<ValueNode>>, SynthesisError> {
        if self.depth >= MAX_NESTING {
            return Err(SynthesisError::Resolution(format!(
                "field '{key}' of '{owner}' is nested more than {MAX_NESTING} levels deep"
            )));
        }
        self.depth += 1;
        let resolved = self.resolve_nested(owner, key, type_ref);
        self.depth -= 1;
        resolved
    }

    fn resolve_nested(
        &mut self,
        owner: &str,
        key: &str,
        type_ref: &'a TypeRef,
    ) -> Result<Option<Rc<ValueNode>>, SynthesisError> {
        match type_ref {
            TypeRef::Scalar(kind) => Ok(Some(Rc::new(self.literal(owner, key, *kind)?))),
            TypeRef::Named(name) => self.resolve(name),
            TypeRef::Array(element) => Ok(Some(Rc::new(self.array(owner, key, element)?))),
            TypeRef::InlineRecord(declaration) if self.declarations.contains(&declaration.name) => {
                self.resolve(&declaration.name)
            }
            TypeRef::InlineRecord(declaration) => {
                Ok(Some(Rc::new(self.synthesize_object(declaration)?)))
            }
            TypeRef::Unsupported(_) => Ok(None),
        }
    }

    /// Scalar elements are generated independently; any other element is
    /// resolved once and repeated.
    fn array(
        &mut self,
        owner: &str,
        key: &str,
        element: &'a TypeRef,
    ) -> Result<ValueNode, SynthesisError> {
        let children = match element {
            TypeRef::Scalar(kind) => {
                let mut children = Vec::with_capacity(SCALAR_ARRAY_LEN);
                for _ in 0..SCALAR_ARRAY_LEN {
                    children.push(Rc::new(self.literal(owner, key, *kind)?));
                }
                children
            }
            _ => match self.resolve_type(owner, key, element)? {
                Some(node) if !node.is_reference() => vec![node; RECORD_ARRAY_LEN],
                _ => Vec::new(),
            },
        };
        Ok(ValueNode::Array { children })
    }

    fn literal(
        &mut self,
        owner: &str,
        key: &str,
        kind: ScalarKind,
    ) -> Result<ValueNode, SynthesisError> {
        let registry = self.registry;
        let id = registry.select(kind, key);
        let generator = registry.generator(id).ok_or_else(|| {
            SynthesisError::Resolution(format!("generator '{id}' is not registered"))
        })?;
        let value = generator.generate(&mut *self.rng);
        if value.kind() != kind {
            return Err(SynthesisError::Resolution(format!(
                "generator '{id}' produced a {} for {} field '{key}' of '{owner}'",
                value.kind().as_str(),
                kind.as_str()
            )));
        }
        self.report.record_generator_usage(id);
        Ok(ValueNode::Literal(value))
    }

    fn record_omitted(&mut self, declaration: &TypeDeclaration, field: &FieldDeclaration, key: &str) {
        let (code, message) = match omission_cause(&field.type_ref) {
            Some(TypeRef::Named(name)) => (
                "unresolved_type",
                format!("type '{name}' is not a declared record or supported primitive"),
            ),
            Some(other) => (
                "unsupported_type",
                format!("type '{}' cannot be synthesized", other.describe()),
            ),
            None => ("omitted", "field produced no value".to_string()),
        };
        self.report.record_issue(SynthesisIssue {
            code: code.to_string(),
            message,
            declaration: declaration.name.clone(),
            field: key.to_string(),
            position: field.position,
        });
    }
}

/// Type that made a field resolve to nothing.
fn omission_cause(type_ref: &TypeRef) -> Option<&TypeRef> {
    match type_ref {
        TypeRef::Named(_) | TypeRef::Unsupported(_) => Some(type_ref),
        TypeRef::Scalar(_) | TypeRef::Array(_) | TypeRef::InlineRecord(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use jsonsample_core::{extract_declarations, name_fields};

    use super::*;
    use crate::value::LiteralValue;

    struct Fixture {
        declarations: DeclarationSet,
        names: FieldNames,
        registry: GeneratorRegistry,
        rng: ChaCha8Rng,
        report: SynthesisReport,
    }

    impl Fixture {
        fn new(source: &str) -> Self {
            let mut declarations = extract_declarations(source).expect("parse");
            let names = name_fields(&mut declarations).expect("names");
            Self {
                declarations,
                names,
                registry: GeneratorRegistry::new(),
                rng: ChaCha8Rng::seed_from_u64(7),
                report: SynthesisReport::new("test".to_string(), 7),
            }
        }

        fn resolver(&mut self) -> Resolver<'_> {
            Resolver::new(
                &self.declarations,
                &self.names,
                &self.registry,
                &mut self.rng,
                &mut self.report,
            )
        }
    }

    #[test]
    fn memoized_declarations_are_shared() {
        let mut fixture = Fixture::new("type A struct { Name string }");
        let mut resolver = fixture.resolver();
        let first = resolver.resolve("A").expect("resolve").expect("known");
        let second = resolver.resolve("A").expect("resolve").expect("known");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_names_resolve_to_nothing() {
        let mut fixture = Fixture::new("type A struct { Name string }");
        let mut resolver = fixture.resolver();
        assert_eq!(resolver.resolve("Missing").expect("resolve"), None);
    }

    #[test]
    fn direct_self_reference_becomes_a_reference_node() {
        let mut fixture = Fixture::new("type Node struct { Value int; Parent *Node; Children []Node }");
        let mut resolver = fixture.resolver();
        let node = resolver.resolve("Node").expect("resolve").expect("known");
        assert_eq!(
            node.get("parent").map(|child| child.as_ref()),
            Some(&ValueNode::Reference {
                target: "Node".to_string()
            })
        );
        assert_eq!(
            node.get("children").and_then(|child| child.elements()).map(<[_]>::len),
            Some(0)
        );
    }

    #[test]
    fn record_arrays_repeat_one_node() {
        let mut fixture = Fixture::new(
            "type Item struct { Sku string }\ntype Cart struct { Items []Item; Codes []int }",
        );
        let mut resolver = fixture.resolver();
        let cart = resolver.resolve("Cart").expect("resolve").expect("known");

        let items = cart.get("items").and_then(|node| node.elements()).expect("items");
        assert_eq!(items.len(), RECORD_ARRAY_LEN);
        assert!(Rc::ptr_eq(&items[0], &items[1]));

        let codes = cart.get("codes").and_then(|node| node.elements()).expect("codes");
        assert_eq!(codes.len(), SCALAR_ARRAY_LEN);
        assert!(codes.iter().all(|code| matches!(
            code.as_literal(),
            Some(LiteralValue::Int(value)) if *value >= 0
        )));
    }

    #[test]
    fn omitted_fields_are_reported() {
        let mut fixture = Fixture::new(
            "type A struct { When time.Time; Ref Missing; Lookup map[string]int; Ok bool }",
        );
        let node = {
            let mut resolver = fixture.resolver();
            resolver.resolve("A").expect("resolve").expect("known")
        };
        assert_eq!(node.get("ok").and_then(|n| n.as_literal()), Some(&LiteralValue::Bool(true)));
        assert_eq!(node.get("when"), None);

        let codes: Vec<&str> = fixture.report.issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["unsupported_type", "unresolved_type", "unsupported_type"]);
        let counts = fixture.report.declaration("A").expect("counts");
        assert_eq!(counts.fields_synthesized, 1);
        assert_eq!(counts.fields_omitted, 3);
    }

    #[test]
    fn missing_field_names_are_a_resolution_error() {
        let declarations = extract_declarations("type A struct { Name string }").expect("parse");
        let names = FieldNames::default();
        let registry = GeneratorRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut report = SynthesisReport::new("test".to_string(), 1);
        let mut resolver = Resolver::new(&declarations, &names, &registry, &mut rng, &mut report);

        let err = resolver.resolve("A").expect_err("invariant");
        assert!(matches!(err, SynthesisError::Resolution(_)));
    }

    #[test]
    fn missing_generator_is_a_resolution_error() {
        let mut declarations = extract_declarations("type A struct { Count int }").expect("parse");
        let names = name_fields(&mut declarations).expect("names");
        let registry = GeneratorRegistry::empty();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut report = SynthesisReport::new("test".to_string(), 1);
        let mut resolver = Resolver::new(&declarations, &names, &registry, &mut rng, &mut report);

        let err = resolver.resolve("A").expect_err("invariant");
        assert!(matches!(err, SynthesisError::Resolution(message) if message.contains("primitive.int")));
    }

    fn chain(length: usize) -> String {
        (0..length)
            .map(|i| format!("type T{i} struct {{ Next T{} }}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn chains_within_the_nesting_limit_resolve() {
        let mut fixture = Fixture::new(&chain(MAX_NESTING));
        let mut resolver = fixture.resolver();
        let root = resolver.resolve("T0").expect("resolve").expect("known");
        assert!(root.get("next").is_some());
        assert_eq!(resolver.depth, 0);
    }

    #[test]
    fn chains_past_the_nesting_limit_fail_cleanly() {
        let mut fixture = Fixture::new(&chain(MAX_NESTING + 10));
        let mut resolver = fixture.resolver();
        let err = resolver.resolve("T0").expect_err("too deep");
        assert!(matches!(err, SynthesisError::Resolution(message) if message.contains("nested")));
        assert_eq!(resolver.depth, 0);
    }

    struct Mislabeled;

    impl crate::generators::Generator for Mislabeled {
        fn id(&self) -> &'static str {
            crate::generators::primitives::INT
        }

        fn generate(&self, _rng: &mut dyn RngCore) -> LiteralValue {
            LiteralValue::Text("seven".to_string())
        }
    }

    #[test]
    fn generator_of_the_wrong_kind_is_a_resolution_error() {
        let mut declarations = extract_declarations("type A struct { Count int }").expect("parse");
        let names = name_fields(&mut declarations).expect("names");
        let mut registry = GeneratorRegistry::new();
        registry.register_generator(Box::new(Mislabeled));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut report = SynthesisReport::new("test".to_string(), 1);
        let mut resolver = Resolver::new(&declarations, &names, &registry, &mut rng, &mut report);

        let err = resolver.resolve("A").expect_err("kind mismatch");
        assert!(matches!(
            err,
            SynthesisError::Resolution(message) if message.contains("produced a string for int field")
        ));
    }
}
