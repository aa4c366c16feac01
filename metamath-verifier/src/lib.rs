//! A verifier for the Metamath formal-proof language.
//!
//! Given a Metamath database — a stream of declarations, hypotheses,
//! axioms and proofs — this crate parses it, maintains the scoped
//! declaration environment it implies, and mechanically checks every
//! supplied proof against the axioms and prior theorems it references.
//!
//! The two entry points a host embeds against are [`Database::ingest`]
//! (drive a source to completion, optionally verifying every `$p` it
//! contains) and [`Database::prove`] (check one proof standalone against
//! the current label table and frame stack).
//!
//! This crate does not implement a command-line interface, proof
//! generation, database-semantics checks beyond proof-checking (e.g. axiom
//! minimality), human-readable proof trees, persistence, or parallel or
//! incremental verification — see the workspace's `metamath-verifier-cli`
//! crate for a thin wrapper that drives this library from a file path.

mod assertion;
mod checker;
mod compress;
pub mod error;
mod expr;
mod labels;
mod scope;
mod subst;
mod token;

mod database;

pub use assertion::AssertionFrame;
pub use database::Database;
pub use error::{Kind, Result, VerificationError};
pub use expr::{intern, Expression, Token};
pub use labels::LabelEntry;
