//! FHIRPath system model
//!
//! This crate defines the system-level value model including:
//! - The system value union (Boolean, Integer, Decimal, String, Date, DateTime, Time, Quantity)
//! - Equality, equivalence, and ordering contracts across kinds
//! - Calendar-aware temporal arithmetic with fractional spill
//! - Quantity algebra backed by a self-contained unit catalog
//! - Type specs with base-chain subsumption
//! - Collections and the model adapter boundary for foreign data trees

pub mod adapter;
pub mod collection;
pub mod decimal;
pub mod quantity;
pub mod temporal;
pub mod types;
pub mod ucum;
pub mod value;

pub use adapter::*;
pub use collection::*;
pub use decimal::*;
pub use quantity::*;
pub use temporal::*;
pub use types::*;
pub use value::*;
