//! System type discriminants and type specifiers
//!
//! Every value carries a fixed [`SystemType`] discriminant and a
//! [`TypeSpec`] describing its fully-qualified type name plus the chain of
//! base types. Type specs drive the common-base inference used by
//! collections to narrow their item type as values are added.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Fixed discriminant for every value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemType {
    /// Root of the system hierarchy
    Any,
    /// Boolean value
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// Arbitrary-precision decimal
    Decimal,
    /// UTF-8 string
    String,
    /// Date with year/month/day precision
    Date,
    /// Date and time with up to nanosecond precision
    DateTime,
    /// Time of day with up to nanosecond precision
    Time,
    /// Decimal value with a unit
    Quantity,
    /// Ordered collection of values
    Collection,
    /// Unconverted foreign model node
    Node,
}

impl SystemType {
    /// Short type name without namespace
    pub const fn name(&self) -> &'static str {
        match self {
            SystemType::Any => "Any",
            SystemType::Boolean => "Boolean",
            SystemType::Integer => "Integer",
            SystemType::Decimal => "Decimal",
            SystemType::String => "String",
            SystemType::Date => "Date",
            SystemType::DateTime => "DateTime",
            SystemType::Time => "Time",
            SystemType::Quantity => "Quantity",
            SystemType::Collection => "Collection",
            SystemType::Node => "Node",
        }
    }

    /// Fully-qualified type name.
    ///
    /// A raw node is only statically known to be `System.Any`; its precise
    /// type lives in the spec carried by the node itself.
    pub const fn qualified_name(&self) -> &'static str {
        match self {
            SystemType::Any | SystemType::Node => "System.Any",
            SystemType::Boolean => "System.Boolean",
            SystemType::Integer => "System.Integer",
            SystemType::Decimal => "System.Decimal",
            SystemType::String => "System.String",
            SystemType::Date => "System.Date",
            SystemType::DateTime => "System.DateTime",
            SystemType::Time => "System.Time",
            SystemType::Quantity => "System.Quantity",
            SystemType::Collection => "System.Collection",
        }
    }

    /// Whether values of this kind hold numeric content
    pub const fn is_numeric(&self) -> bool {
        matches!(self, SystemType::Integer | SystemType::Decimal)
    }

    /// Whether values of this kind are temporal
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            SystemType::Date | SystemType::DateTime | SystemType::Time
        )
    }

    /// Type spec for this kind, rooted at `System.Any`
    pub fn type_spec(&self) -> TypeSpec {
        match self {
            SystemType::Any | SystemType::Node => SYSTEM_ANY.as_ref().clone(),
            SystemType::Boolean => SYSTEM_BOOLEAN.as_ref().clone(),
            SystemType::Integer => SYSTEM_INTEGER.as_ref().clone(),
            SystemType::Decimal => SYSTEM_DECIMAL.as_ref().clone(),
            SystemType::String => SYSTEM_STRING.as_ref().clone(),
            SystemType::Date => SYSTEM_DATE.as_ref().clone(),
            SystemType::DateTime => SYSTEM_DATETIME.as_ref().clone(),
            SystemType::Time => SYSTEM_TIME.as_ref().clone(),
            SystemType::Quantity => SYSTEM_QUANTITY.as_ref().clone(),
            SystemType::Collection => SYSTEM_COLLECTION.as_ref().clone(),
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// A fully-qualified type name plus its chain of base types.
///
/// Foreign models supply their own specs (`FHIR.Patient` →
/// `FHIR.DomainResource` → … → `System.Any`); system kinds all derive
/// directly from `System.Any`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    qualified: String,
    base: Option<Arc<TypeSpec>>,
}

impl TypeSpec {
    /// Create a spec with a base type
    pub fn new(qualified: impl Into<String>, base: Arc<TypeSpec>) -> Self {
        Self {
            qualified: qualified.into(),
            base: Some(base),
        }
    }

    /// Create a root spec with no base
    pub fn root(qualified: impl Into<String>) -> Self {
        Self {
            qualified: qualified.into(),
            base: None,
        }
    }

    /// The fully-qualified name, e.g. `System.Integer`
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// The namespace part of the qualified name
    pub fn namespace(&self) -> &str {
        self.qualified
            .split_once('.')
            .map(|(ns, _)| ns)
            .unwrap_or("")
    }

    /// The name part without the namespace
    pub fn name(&self) -> &str {
        self.qualified
            .split_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.qualified)
    }

    /// The direct base type, if any
    pub fn base(&self) -> Option<&TypeSpec> {
        self.base.as_deref()
    }

    /// Whether this spec or any of its bases carries the given name
    pub fn is_type(&self, qualified: &str) -> bool {
        let mut current = Some(self);
        while let Some(spec) = current {
            if spec.qualified == qualified {
                return true;
            }
            current = spec.base();
        }
        false
    }

    /// Nearest ancestor shared with `other`, including the specs
    /// themselves. `None` when the chains never meet.
    pub fn common_base(&self, other: &TypeSpec) -> Option<TypeSpec> {
        let mut candidate = Some(self);
        while let Some(spec) = candidate {
            if other.is_type(&spec.qualified) {
                return Some(spec.clone());
            }
            candidate = spec.base();
        }
        None
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified)
    }
}

static SYSTEM_ANY: Lazy<Arc<TypeSpec>> = Lazy::new(|| Arc::new(TypeSpec::root("System.Any")));
static SYSTEM_BOOLEAN: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Boolean", SYSTEM_ANY.clone())));
static SYSTEM_INTEGER: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Integer", SYSTEM_ANY.clone())));
static SYSTEM_DECIMAL: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Decimal", SYSTEM_ANY.clone())));
static SYSTEM_STRING: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.String", SYSTEM_ANY.clone())));
static SYSTEM_DATE: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Date", SYSTEM_ANY.clone())));
static SYSTEM_DATETIME: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.DateTime", SYSTEM_ANY.clone())));
static SYSTEM_TIME: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Time", SYSTEM_ANY.clone())));
static SYSTEM_QUANTITY: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Quantity", SYSTEM_ANY.clone())));
static SYSTEM_COLLECTION: Lazy<Arc<TypeSpec>> =
    Lazy::new(|| Arc::new(TypeSpec::new("System.Collection", SYSTEM_ANY.clone())));

/// Shared `System.Any` spec, the root of every chain
pub fn any_type_spec() -> Arc<TypeSpec> {
    SYSTEM_ANY.clone()
}
