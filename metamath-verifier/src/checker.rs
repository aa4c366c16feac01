//! The proof checker: a stack machine over the label table and current
//! frame stack. Reads both but never mutates them.

use crate::compress::decompress_proof;
use crate::error::{mm_err, Kind, Result};
use crate::expr::{Expression, Token};
use crate::labels::{LabelEntry, LabelTable};
use crate::scope::FrameStack;
use crate::subst::{apply_subst, find_vars, Subst};
use log::{debug, trace};

/// Runs the proof checker for `label`'s `proof` against `stat`, returning the
/// expression derived on the stack.
///
/// If the proof begins with `(` it is decompressed first. Does not itself
/// compare the derived expression against `stat` — that is `verify`'s job,
/// letting `prove` also serve as the standalone "derive it for me" entry
/// point.
pub fn run_proof(
    fs: &FrameStack,
    labels: &LabelTable,
    label: &str,
    stat: &Expression,
    proof: &[Token],
) -> Result<Expression> {
    let steps: Vec<String> = if proof.first().map(|t| &**t) == Some("(") {
        decompress_proof(fs, labels, stat, proof)?
    } else {
        proof.iter().map(|t| t.to_string()).collect()
    };

    let mut stack: Vec<Expression> = Vec::new();

    for step in &steps {
        let entry = labels.require(step)?;
        trace!("{}: step {} -> {:?}", label, step, entry);
        match entry {
            LabelEntry::Floating { .. } | LabelEntry::Essential(_) => {
                stack.push(entry.hypothesis_expression().expect("checked above"));
            }
            LabelEntry::Axiom(af) | LabelEntry::Theorem(af) => {
                let n = af.arity();
                if stack.len() < n {
                    return Err(mm_err!(
                        Kind::StackUnderflow,
                        "{} needs {} stack entries, only {} available",
                        step,
                        n,
                        stack.len()
                    ));
                }
                let sp = stack.len() - n;
                let mut subst: Subst = Subst::new();
                let mut cursor = sp;
                for (kind, var) in &af.mand_hyps {
                    let entry = &stack[cursor];
                    if entry.typecode() != Some(kind) {
                        return Err(mm_err!(
                            Kind::TypecodeMismatch,
                            "stack entry {} doesn't match mandatory hypothesis typecode {}",
                            entry,
                            kind
                        ));
                    }
                    subst.insert(var.clone(), Expression::new(entry.tail().to_vec()));
                    cursor += 1;
                }

                for (x, y) in &af.dv {
                    let sx = subst.get(x).cloned().unwrap_or_default();
                    let sy = subst.get(y).cloned().unwrap_or_default();
                    let xs = find_vars(fs, &sx);
                    let ys = find_vars(fs, &sy);
                    for u in &xs {
                        for v in &ys {
                            if u == v || !fs.lookup_disjoint(u, v) {
                                return Err(mm_err!(
                                    Kind::DisjointViolation,
                                    "{}, {}",
                                    u,
                                    v
                                ));
                            }
                        }
                    }
                }

                for hyp in &af.ess_hyps {
                    let entry = &stack[cursor];
                    let expected = apply_subst(hyp, &subst);
                    if *entry != expected {
                        return Err(mm_err!(
                            Kind::HypothesisMismatch,
                            "stack entry {} doesn't match hypothesis {}",
                            entry,
                            expected
                        ));
                    }
                    cursor += 1;
                }

                stack.truncate(sp);
                let derived = apply_subst(&af.conclusion, &subst);
                debug!("{}: {} => {}", label, step, derived);
                stack.push(derived);
            }
        }
    }

    if stack.len() != 1 {
        return Err(mm_err!(
            Kind::StackMismatch,
            "proof for {} ends with {} stack entries, expected 1",
            label,
            stack.len()
        ));
    }
    Ok(stack.into_iter().next().expect("checked len == 1"))
}

/// Runs the proof checker and additionally requires the derived expression
/// to equal `stat` token-for-token.
pub fn verify(
    fs: &FrameStack,
    labels: &LabelTable,
    label: &str,
    stat: &Expression,
    proof: &[Token],
) -> Result<Expression> {
    let derived = run_proof(fs, labels, label, stat, proof)?;
    if derived != *stat {
        return Err(mm_err!(
            Kind::AssertionMismatch,
            "proof of {} derived {} but {} was claimed",
            label,
            derived,
            stat
        ));
    }
    Ok(derived)
}
