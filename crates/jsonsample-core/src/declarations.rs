use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::source::Position;

/// Primitive kinds a field can be synthesized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Bool,
}

impl ScalarKind {
    /// Maps a predeclared Go type identifier to its scalar kind.
    pub fn from_ident(name: &str) -> Option<Self> {
        match name {
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" | "byte" | "rune" => Some(Self::Int),
            "float32" | "float64" => Some(Self::Float),
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
        }
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Scalar(ScalarKind),
    /// Reference to another declaration by name.
    Named(String),
    /// Slice or fixed-size array.
    Array(Box<TypeRef>),
    /// Anonymous `struct { ... }` written at the point of use.
    InlineRecord(TypeDeclaration),
    /// Maps, channels, functions, interfaces and package-qualified types.
    Unsupported(String),
}

impl TypeRef {
    pub fn from_ident(name: &str) -> Self {
        match ScalarKind::from_ident(name) {
            Some(kind) => TypeRef::Scalar(kind),
            None => TypeRef::Named(name.to_string()),
        }
    }

    /// Go-like rendering of the type, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TypeRef::Scalar(kind) => kind.as_str().to_string(),
            TypeRef::Named(name) => name.clone(),
            TypeRef::Array(element) => format!("[]{}", element.describe()),
            TypeRef::InlineRecord(decl) if decl.name.is_empty() => "struct{...}".to_string(),
            TypeRef::InlineRecord(decl) => format!("struct {}", decl.name),
            TypeRef::Unsupported(text) => text.clone(),
        }
    }
}

/// Raw field annotation with the literal delimiters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub text: String,
    pub position: Position,
}

/// One field statement of a record declaration.
///
/// `names` holds every identifier the statement binds; the field namer
/// rejects statements that do not bind exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub names: Vec<String>,
    pub type_ref: TypeRef,
    pub tag: Option<RawTag>,
    pub position: Position,
}

impl FieldDeclaration {
    pub fn identifier(&self) -> Option<&str> {
        match self.names.as_slice() {
            [name] => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Where a declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationOrigin {
    TopLevel,
    /// Registered for an anonymous record found in a field of `parent`.
    Inline { parent: String },
}

/// A named record type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
    pub position: Position,
    pub origin: DeclarationOrigin,
}

impl TypeDeclaration {
    pub fn is_top_level(&self) -> bool {
        self.origin == DeclarationOrigin::TopLevel
    }
}

/// Declarations of one pass, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSet {
    declarations: IndexMap<String, TypeDeclaration>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-registering a name replaces the body but keeps the original slot.
    pub fn insert(&mut self, declaration: TypeDeclaration) {
        self.declarations
            .insert(declaration.name.clone(), declaration);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        self.declarations.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypeDeclaration> {
        self.declarations.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.declarations.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.values()
    }

    pub fn top_level(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.iter().filter(|decl| decl.is_top_level())
    }
}
