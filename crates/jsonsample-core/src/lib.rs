//! Declaration contracts for jsonsample.
//!
//! This crate turns Go-style record declarations into an ordered
//! [`DeclarationSet`] and derives the output key of every field. Value
//! synthesis lives in `jsonsample-generate`.

pub mod declarations;
pub mod error;
pub mod lexer;
pub mod naming;
pub mod parser;
pub mod source;
pub mod tags;

pub use declarations::{
    DeclarationOrigin, DeclarationSet, FieldDeclaration, RawTag, ScalarKind, TypeDeclaration,
    TypeRef,
};
pub use error::{Error, Result};
pub use naming::{FieldNames, FieldSlot, is_exported, name_field, name_fields, output_key_for};
pub use parser::extract_declarations;
pub use source::{Position, SourceMap};
