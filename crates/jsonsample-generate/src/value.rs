use std::rc::Rc;

use indexmap::IndexMap;

use jsonsample_core::ScalarKind;

/// Scalar content of a literal node.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl LiteralValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            LiteralValue::Int(_) => ScalarKind::Int,
            LiteralValue::Float(_) => ScalarKind::Float,
            LiteralValue::Text(_) => ScalarKind::String,
            LiteralValue::Bool(_) => ScalarKind::Bool,
        }
    }
}

/// Synthesized document tree.
///
/// Children are reference counted: a memoized object reached from several
/// places is shared, not copied.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Object {
        source_name: String,
        children: IndexMap<String, Rc<ValueNode>>,
    },
    Array {
        children: Vec<Rc<ValueNode>>,
    },
    Literal(LiteralValue),
    /// Back-edge to a declaration that was still being synthesized.
    Reference {
        target: String,
    },
}

impl ValueNode {
    /// Child of an object by key.
    pub fn get(&self, key: &str) -> Option<&Rc<ValueNode>> {
        match self {
            ValueNode::Object { children, .. } => children.get(key),
            _ => None,
        }
    }

    /// Elements of an array node.
    pub fn elements(&self) -> Option<&[Rc<ValueNode>]> {
        match self {
            ValueNode::Array { children } => Some(children.as_slice()),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            ValueNode::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ValueNode::Reference { .. })
    }
}
