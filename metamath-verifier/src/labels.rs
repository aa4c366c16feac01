//! The process-wide label table: labels are write-once.

use crate::assertion::AssertionFrame;
use crate::error::{mm_err, Kind, Result};
use crate::expr::{Expression, Token};
use std::collections::HashMap;

/// What a label names.
#[derive(Debug, Clone)]
pub enum LabelEntry {
    Floating { typecode: Token, variable: Token },
    Essential(Expression),
    Axiom(AssertionFrame),
    Theorem(AssertionFrame),
}

impl LabelEntry {
    /// The assertion-frame of an axiom/theorem, if this entry is one.
    #[must_use]
    pub fn assertion(&self) -> Option<&AssertionFrame> {
        match self {
            LabelEntry::Axiom(af) | LabelEntry::Theorem(af) => Some(af),
            _ => None,
        }
    }

    /// The expression this label pushes onto the proof stack when cited
    /// directly as a hypothesis (floating or essential).
    #[must_use]
    pub fn hypothesis_expression(&self) -> Option<Expression> {
        match self {
            LabelEntry::Floating { typecode, variable } => {
                Some(Expression::new(vec![typecode.clone(), variable.clone()]))
            }
            LabelEntry::Essential(e) => Some(e.clone()),
            _ => None,
        }
    }
}

/// A process-wide mapping from label strings to their kind and payload.
/// Append-only during a session: once a label is recorded it is never
/// redefined.
#[derive(Debug, Default)]
pub struct LabelTable(HashMap<String, LabelEntry>);

impl LabelTable {
    #[must_use]
    pub fn new() -> Self {
        LabelTable(HashMap::new())
    }

    pub fn insert(&mut self, label: &str, entry: LabelEntry) -> Result<()> {
        if self.0.contains_key(label) {
            return Err(mm_err!(Kind::DuplicateLabel, "label {} already defined", label));
        }
        self.0.insert(label.to_string(), entry);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&LabelEntry> {
        self.0.get(label)
    }

    pub fn require(&self, label: &str) -> Result<&LabelEntry> {
        self.get(label)
            .ok_or_else(|| mm_err!(Kind::UnknownLabel, "unknown label {}", label))
    }
}
