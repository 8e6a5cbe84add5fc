//! Field namer.
//!
//! Decides which fields take part in synthesis and the key each one is
//! rendered under. Anonymous records met along the way are registered as
//! declarations named after their path (`Parent.Field`).

use std::collections::{HashMap, VecDeque};

use convert_case::{Case, Casing};

use crate::declarations::{
    DeclarationOrigin, DeclarationSet, FieldDeclaration, TypeDeclaration, TypeRef,
};
use crate::error::{Error, Result};
use crate::tags::json_key_override;

/// Naming outcome of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSlot {
    /// Not exported; the field is skipped.
    Excluded,
    Key(String),
}

/// Output keys of every declaration, aligned with field indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNames {
    slots: HashMap<String, Vec<FieldSlot>>,
}

impl FieldNames {
    pub fn slot(&self, declaration: &str, index: usize) -> Option<&FieldSlot> {
        self.slots.get(declaration)?.get(index)
    }

    pub fn slots(&self, declaration: &str) -> Option<&[FieldSlot]> {
        self.slots.get(declaration).map(Vec::as_slice)
    }

    /// Keys of the included fields of `declaration`, in field order.
    pub fn keys<'a>(&'a self, declaration: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.slots
            .get(declaration)
            .into_iter()
            .flatten()
            .filter_map(|slot| match slot {
                FieldSlot::Key(key) => Some(key.as_str()),
                FieldSlot::Excluded => None,
            })
    }
}

/// Names the fields of every declaration in `set`.
///
/// Inline records of included fields are added to `set` under their path
/// name, and the `TypeRef::InlineRecord` pointing at them is renamed to match.
pub fn name_fields(set: &mut DeclarationSet) -> Result<FieldNames> {
    let mut names = FieldNames::default();
    let mut queue: VecDeque<String> = set.names().cloned().collect();

    while let Some(declaration_name) = queue.pop_front() {
        let Some(declaration) = set.get_mut(&declaration_name) else {
            continue;
        };

        let mut slots = Vec::with_capacity(declaration.fields.len());
        let mut discovered = Vec::new();
        for field in declaration.fields.iter_mut() {
            let identifier = single_identifier(field)?;
            if !is_exported(&identifier) {
                slots.push(FieldSlot::Excluded);
                continue;
            }

            if let Some(inline) = inline_record_mut(&mut field.type_ref) {
                inline.name = format!("{declaration_name}.{identifier}");
                inline.origin = DeclarationOrigin::Inline {
                    parent: declaration_name.clone(),
                };
                discovered.push(inline.clone());
            }

            slots.push(FieldSlot::Key(output_key_for(field, &identifier)?));
        }

        names.slots.insert(declaration_name, slots);
        for inline in discovered {
            queue.push_back(inline.name.clone());
            set.insert(inline);
        }
    }

    Ok(names)
}

/// Names a single field without registering inline records.
pub fn name_field(field: &FieldDeclaration) -> Result<FieldSlot> {
    let identifier = single_identifier(field)?;
    if !is_exported(&identifier) {
        return Ok(FieldSlot::Excluded);
    }
    Ok(FieldSlot::Key(output_key_for(field, &identifier)?))
}

/// Exported identifiers start with an upper-case letter.
pub fn is_exported(identifier: &str) -> bool {
    identifier.chars().next().is_some_and(char::is_uppercase)
}

/// Snake-cased identifier unless the `json` tag overrides it.
pub fn output_key_for(field: &FieldDeclaration, identifier: &str) -> Result<String> {
    if let Some(tag) = &field.tag
        && let Some(name) = json_key_override(tag)?
    {
        return Ok(name);
    }
    Ok(identifier.to_case(Case::Snake))
}

fn single_identifier(field: &FieldDeclaration) -> Result<String> {
    match field.names.as_slice() {
        [name] => Ok(name.clone()),
        [] => Err(Error::MalformedField {
            position: field.position,
            message: format!(
                "embedded field {} must be given a name",
                field.type_ref.describe()
            ),
        }),
        many => Err(Error::MalformedField {
            position: field.position,
            message: format!(
                "statement binds {} identifiers ({}), expected one",
                many.len(),
                many.join(", ")
            ),
        }),
    }
}

fn inline_record_mut(type_ref: &mut TypeRef) -> Option<&mut TypeDeclaration> {
    match type_ref {
        TypeRef::InlineRecord(declaration) => Some(declaration),
        TypeRef::Array(element) => inline_record_mut(element),
        _ => None,
    }
}
