//! Operator evaluator nodes
//!
//! Each module covers one grammar production family. All operators share
//! the same contract: operands are evaluated through the context (so
//! depth counting stays uniform), collapsed to singletons where the
//! operator needs one value, and dispatched over value-kind pairs.
//! Empty operands propagate per operator-specific rules; kind mismatches
//! that can never work are evaluation errors.

pub mod arithmetic;
pub mod collection;
pub mod comparison;
pub mod equality;
pub mod logical;
