//! Model adapter trait for foreign data models
//!
//! The engine never understands a domain model directly. A foreign node
//! is an opaque [`ModelNode`] handle; the adapter converts it to a system
//! value where one maps, reports its type, compares nodes by the model's
//! own rules, and navigates named members. A JSON-backed adapter is
//! provided for embedding and tests.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::decimal::parse_decimal;
use crate::types::{any_type_spec, TypeSpec};
use crate::value::SystemValue;

/// Model adapter error
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// An opaque handle to a foreign model node.
///
/// The payload sits behind an `Arc`, so cloning a node never copies the
/// underlying data. The type spec is stamped by the adapter when the node
/// is created.
#[derive(Debug, Clone)]
pub struct ModelNode {
    data: Arc<Value>,
    type_spec: TypeSpec,
}

impl ModelNode {
    pub fn new(data: Value, type_spec: TypeSpec) -> Self {
        Self {
            data: Arc::new(data),
            type_spec,
        }
    }

    pub fn from_shared(data: Arc<Value>, type_spec: TypeSpec) -> Self {
        Self { data, type_spec }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn type_spec(&self) -> &TypeSpec {
        &self.type_spec
    }
}

impl PartialEq for ModelNode {
    fn eq(&self, other: &Self) -> bool {
        self.type_spec == other.type_spec && self.data == other.data
    }
}

/// Trait adapting a foreign data model to the system value space
pub trait ModelAdapter: Send + Sync {
    /// Convert a foreign node into a system value, when one maps.
    /// Composite nodes stay foreign and yield `None`.
    fn convert_to_system(&self, node: &ModelNode) -> Result<Option<SystemValue>, ModelError>;

    /// The type of a foreign node
    fn type_spec(&self, node: &ModelNode) -> TypeSpec;

    /// Model-defined equality between foreign nodes
    fn equal(&self, left: &ModelNode, right: &ModelNode) -> bool;

    /// Model-defined equivalence between foreign nodes
    fn equivalent(&self, left: &ModelNode, right: &ModelNode) -> bool;

    /// Navigate a named member. Absent members and null entries yield an
    /// empty result, not an error; arrays yield one entry per element.
    fn navigate(&self, node: &ModelNode, name: &str) -> Result<Vec<SystemValue>, ModelError>;
}

/// Adapter over plain JSON documents.
///
/// Scalars map onto system values, objects and arrays stay foreign, and
/// equality is structural. Objects carrying a `resourceType` member are
/// stamped with a `FHIR.<type>` spec so collections of resources narrow
/// usefully.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonModelAdapter;

impl JsonModelAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Wrap a JSON document as a foreign node.
    pub fn node_for(&self, data: Value) -> ModelNode {
        let spec = Self::spec_for(&data);
        ModelNode::new(data, spec)
    }

    fn spec_for(data: &Value) -> TypeSpec {
        if let Some(resource_type) = data.get("resourceType").and_then(Value::as_str) {
            return TypeSpec::new(format!("FHIR.{resource_type}"), any_type_spec());
        }
        any_type_spec().as_ref().clone()
    }

    /// Map a JSON scalar onto a system value. Composites and nulls have
    /// no scalar mapping.
    fn scalar_to_system(value: &Value) -> Option<SystemValue> {
        match value {
            Value::Bool(b) => Some(SystemValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if let Ok(small) = i32::try_from(i) {
                        return Some(SystemValue::Integer(small));
                    }
                }
                parse_decimal(&n.to_string()).map(SystemValue::Decimal)
            }
            Value::String(s) => Some(SystemValue::String(s.clone())),
            _ => None,
        }
    }

    fn member_to_system(&self, value: &Value) -> Option<SystemValue> {
        match value {
            Value::Null => None,
            Value::Object(_) | Value::Array(_) => {
                let spec = Self::spec_for(value);
                Some(SystemValue::Node(ModelNode::new(value.clone(), spec)))
            }
            scalar => Self::scalar_to_system(scalar),
        }
    }
}

impl ModelAdapter for JsonModelAdapter {
    fn convert_to_system(&self, node: &ModelNode) -> Result<Option<SystemValue>, ModelError> {
        Ok(Self::scalar_to_system(node.data()))
    }

    fn type_spec(&self, node: &ModelNode) -> TypeSpec {
        node.type_spec().clone()
    }

    fn equal(&self, left: &ModelNode, right: &ModelNode) -> bool {
        left.data() == right.data()
    }

    fn equivalent(&self, left: &ModelNode, right: &ModelNode) -> bool {
        self.equal(left, right)
    }

    fn navigate(&self, node: &ModelNode, name: &str) -> Result<Vec<SystemValue>, ModelError> {
        let Some(member) = node.data().get(name) else {
            return Ok(Vec::new());
        };
        match member {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => Ok(items
                .iter()
                .filter_map(|item| self.member_to_system(item))
                .collect()),
            single => Ok(self.member_to_system(single).into_iter().collect()),
        }
    }
}

/// Shared adapter handle used by contexts and collections
pub type AdapterRef = Arc<dyn ModelAdapter>;
