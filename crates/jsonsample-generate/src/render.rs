//! Text rendering of value trees.
//!
//! The output is JSON-like: one member or element per line, indented one unit
//! per nesting level, no trailing comma. Integers are always bare digits.

use std::fmt::Write as _;

use serde_json::Value;

use crate::model::RenderedDeclaration;
use crate::value::{LiteralValue, ValueNode};

const DEFAULT_INDENT: &str = "\t";

/// Renders `node` with tab indentation, `indent` levels deep.
pub fn render(node: &ValueNode, indent: usize) -> String {
    Renderer::default().render(node, indent)
}

/// Joins rendered declarations into one document, each block headed by a
/// comment naming its declaration.
pub fn render_document(declarations: &[RenderedDeclaration]) -> String {
    declarations
        .iter()
        .map(|declaration| format!("// {}\n{}", declaration.name, declaration.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Clone)]
pub struct Renderer {
    unit: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }
}

impl Renderer {
    pub fn with_indent(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    pub fn render(&self, node: &ValueNode, indent: usize) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node, indent);
        out
    }

    fn write_node(&self, out: &mut String, node: &ValueNode, indent: usize) {
        match node {
            ValueNode::Object { children, .. } if children.is_empty() => out.push_str("{}"),
            ValueNode::Object { children, .. } => {
                out.push('{');
                for (idx, (key, child)) in children.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    self.new_line(out, indent + 1);
                    out.push_str(&quote(key));
                    out.push_str(": ");
                    self.write_node(out, child, indent + 1);
                }
                self.new_line(out, indent);
                out.push('}');
            }
            ValueNode::Array { children } if children.is_empty() => out.push_str("[]"),
            ValueNode::Array { children } => {
                out.push('[');
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    self.new_line(out, indent + 1);
                    self.write_node(out, child, indent + 1);
                }
                self.new_line(out, indent);
                out.push(']');
            }
            ValueNode::Literal(value) => write_literal(out, value),
            ValueNode::Reference { .. } => out.push_str("null"),
        }
    }

    fn new_line(&self, out: &mut String, indent: usize) {
        out.push('\n');
        for _ in 0..indent {
            out.push_str(&self.unit);
        }
    }
}

fn write_literal(out: &mut String, value: &LiteralValue) {
    match value {
        LiteralValue::Int(value) => {
            let _ = write!(out, "{value}");
        }
        LiteralValue::Float(value) if value.is_finite() => {
            let _ = write!(out, "{value}");
        }
        LiteralValue::Float(_) => out.push_str("null"),
        LiteralValue::Text(value) => out.push_str(&quote(value)),
        LiteralValue::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
    }
}

fn quote(text: &str) -> String {
    Value::from(text).to_string()
}
