//! Operator integration tests for FHIRPath evaluation
//!
//! These tests drive compound evaluator trees through the public API and
//! verify:
//! - Correct computation across the interacting value kinds
//! - Empty propagation, with `&` and the boolean operators as the
//!   deliberate exceptions
//! - The separation between empty results and evaluation errors
//! - Three-valued logic when operator families compose

mod arithmetic;
mod collection;
mod comparison;
mod logical;
