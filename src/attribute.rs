//! Storage Attribute Requests
//!
//! Typed constraints parsed from volume options written as
//! `name: "type:value"`, e.g. `minIOPS: "int:500"` or `media: "string:ssd"`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Separator between the type tag and the value
const TYPE_SEPARATOR: char = ':';

// =============================================================================
// Attribute Request
// =============================================================================

/// A typed attribute constraint
///
/// Serialized externally tagged (`{"int": 500}`) so requests with the same
/// textual value but different types never encode identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeRequest {
    Int(i64),
    Bool(bool),
    String(String),
}

impl AttributeRequest {
    /// Type tag used in the option grammar
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeRequest::Int(_) => "int",
            AttributeRequest::Bool(_) => "bool",
            AttributeRequest::String(_) => "string",
        }
    }
}

impl std::fmt::Display for AttributeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeRequest::Int(v) => write!(f, "int:{}", v),
            AttributeRequest::Bool(v) => write!(f, "bool:{}", v),
            AttributeRequest::String(v) => write!(f, "string:{}", v),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse an option value of the form `type:value` into an attribute request
pub fn parse_attribute_request(name: &str, value: &str) -> Result<AttributeRequest> {
    let invalid = |reason: String| Error::AttributeParse {
        name: name.to_string(),
        reason,
    };

    let (type_tag, raw) = value
        .split_once(TYPE_SEPARATOR)
        .ok_or_else(|| invalid(format!("expected type:value, got {:?}", value)))?;

    match type_tag {
        "int" => raw
            .trim()
            .parse::<i64>()
            .map(AttributeRequest::Int)
            .map_err(|e| invalid(format!("invalid int {:?}: {}", raw, e))),
        "bool" => parse_bool(raw.trim())
            .map(AttributeRequest::Bool)
            .ok_or_else(|| invalid(format!("invalid bool {:?}", raw))),
        "string" => Ok(AttributeRequest::String(raw.to_string())),
        other => Err(invalid(format!("unknown attribute type {:?}", other))),
    }
}

/// Boolean spellings accepted by the Docker volume plugin protocol
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
