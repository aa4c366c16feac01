//! The database driver: reads top-level declarations, dispatches to the
//! components above, and records every label in the global label table.

use crate::assertion::make_assertion;
use crate::checker;
use crate::error::{mm_err, Kind, Result, VerificationError};
use crate::expr::{Expression, Token};
use crate::labels::{LabelEntry, LabelTable};
use crate::scope::FrameStack;
use crate::token::Tokenizer;
use log::info;
use std::io::Read;

/// A single verification session: owns the frame stack, the label table and
/// (while `ingest` is running) the token stream.
///
/// There is no process-wide singleton; independent sessions are entirely
/// independent `Database` values.
#[derive(Debug, Default)]
pub struct Database {
    fs: FrameStack,
    labels: LabelTable,
    verified_count: usize,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Database {
            fs: FrameStack::new(),
            labels: LabelTable::new(),
            verified_count: 0,
        }
    }

    /// Number of `$p` theorems successfully checked so far in this session.
    #[must_use]
    pub fn verified_count(&self) -> usize {
        self.verified_count
    }

    /// Looks up a label's kind and payload.
    #[must_use]
    pub fn label_info(&self, label: &str) -> Option<&LabelEntry> {
        self.labels.get(label)
    }

    /// Drives `source` to completion under the diagnostic name `name`,
    /// updating this session's frame stack and label table.
    ///
    /// If `verify` is `false`, `$p` bodies are accepted without running the
    /// proof checker (their assertion-frame is still recorded, so later
    /// theorems may cite them).
    ///
    /// The root frame is pushed before reading and popped at end-of-file;
    /// the label table is not rolled back on error (the session is
    /// considered poisoned).
    pub fn ingest(&mut self, name: impl Into<String>, source: impl Read + 'static, verify: bool) -> Result<()> {
        let mut toks = Tokenizer::new(name, source);
        self.read(&mut toks, verify)
    }

    /// Runs the proof checker standalone: does not touch the frame stack or
    /// label table beyond reading them.
    ///
    /// If `expected` is `Some`, it doubles as the conclusion used to compute
    /// mandatory hypotheses for compressed-proof decompression, and the
    /// derived expression must equal it token-for-token. If `expected` is
    /// `None` the derived expression is returned uncompared — but a
    /// compressed proof has no conclusion to compute mandatory hypotheses
    /// from in that case, so compressed proofs require `expected`.
    pub fn prove(
        &self,
        label: &str,
        expected: Option<&Expression>,
        proof_tokens: &[Token],
    ) -> Result<Expression> {
        match expected {
            Some(stat) => checker::verify(&self.fs, &self.labels, label, stat, proof_tokens),
            None => {
                if proof_tokens.first().map(|t| &**t) == Some("(") {
                    return Err(mm_err!(
                        Kind::MalformedProof,
                        "a compressed proof requires a known conclusion to decompress"
                    ));
                }
                let placeholder = Expression::default();
                checker::run_proof(&self.fs, &self.labels, label, &placeholder, proof_tokens)
            }
        }
    }

    fn pos_err(&self, toks: &Tokenizer, kind: Kind, message: impl Into<String>) -> VerificationError {
        let (file, line) = toks.position();
        mm_err!(kind, "{}", message.into()).at(file, line)
    }

    /// Reads tokens into the active scope until `$}` or end-of-stream,
    /// recursing into `${` for nested scopes.
    fn read(&mut self, toks: &mut Tokenizer, verify: bool) -> Result<()> {
        self.fs.push();
        let mut pending_label: Option<String> = None;

        loop {
            let tok = toks.next()?;
            let tok = match tok {
                None => break,
                Some(t) if &*t == "$}" => break,
                Some(t) => t,
            };

            // Only $f/$e/$a/$p consume a pending label; every other
            // directive (or a second bare label) leaves it stray.
            if pending_label.is_some() && !matches!(&*tok, "$f" | "$e" | "$a" | "$p") {
                return Err(self.pos_err(toks, Kind::StrayLabel, "label not consumed by a statement"));
            }

            if &*tok == "$c" {
                for t in toks.read_statement()? {
                    self.fs.add_const(t)?;
                }
            } else if &*tok == "$v" {
                for t in toks.read_statement()? {
                    self.fs.add_var(t)?;
                }
            } else if &*tok == "$d" {
                let stat = toks.read_statement()?;
                self.fs.add_disjoint(&stat);
            } else if &*tok == "$f" {
                let label = pending_label
                    .take()
                    .ok_or_else(|| self.pos_err(toks, Kind::StrayLabel, "$f must have a label"))?;
                let stat = toks.read_statement()?;
                if stat.len() != 2 {
                    return Err(self.pos_err(toks, Kind::MalformedStatement, "$f must have exactly two tokens"));
                }
                let (kind, var) = (stat[0].clone(), stat[1].clone());
                self.fs.add_floating(var.clone(), kind.clone(), &label)?;
                self.labels
                    .insert(&label, LabelEntry::Floating { typecode: kind, variable: var })?;
            } else if &*tok == "$e" {
                let label = pending_label
                    .take()
                    .ok_or_else(|| self.pos_err(toks, Kind::StrayLabel, "$e must have a label"))?;
                let stat = toks.read_statement()?;
                let expr = Expression::new(stat);
                self.fs.add_essential(expr.clone(), &label);
                self.labels.insert(&label, LabelEntry::Essential(expr))?;
            } else if &*tok == "$a" {
                let label = pending_label
                    .take()
                    .ok_or_else(|| self.pos_err(toks, Kind::StrayLabel, "$a must have a label"))?;
                let stat = toks.read_statement()?;
                let af = make_assertion(&self.fs, &Expression::new(stat));
                self.labels.insert(&label, LabelEntry::Axiom(af))?;
            } else if &*tok == "$p" {
                let label = pending_label
                    .take()
                    .ok_or_else(|| self.pos_err(toks, Kind::StrayLabel, "$p must have a label"))?;
                let stat = toks.read_statement()?;
                let split = stat
                    .iter()
                    .position(|t| &**t == "$=")
                    .ok_or_else(|| self.pos_err(toks, Kind::MalformedProof, "$p must contain a proof after $="))?;
                let concl = Expression::new(stat[..split].to_vec());
                let proof = &stat[split + 1..];
                if verify {
                    info!("verifying {}", label);
                    checker::verify(&self.fs, &self.labels, &label, &concl, proof)?;
                    self.verified_count += 1;
                }
                let af = make_assertion(&self.fs, &concl);
                self.labels.insert(&label, LabelEntry::Theorem(af))?;
            } else if &*tok == "${" {
                self.read(toks, verify)?;
            } else if !tok.starts_with('$') {
                pending_label = Some(tok.to_string());
            } else {
                return Err(self.pos_err(toks, Kind::UnknownDirective, format!("unknown directive {}", tok)));
            }
        }

        if pending_label.is_some() {
            return Err(self.pos_err(toks, Kind::StrayLabel, "label not consumed by a statement"));
        }

        self.fs.pop();
        Ok(())
    }
}
