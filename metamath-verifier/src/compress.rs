//! The compressed-proof decoder: expands the letter-encoded compressed
//! proof form into an ordinary sequence of labels.

use crate::assertion::make_assertion;
use crate::error::{mm_err, Kind, Result};
use crate::expr::{Expression, Token};
use crate::labels::LabelTable;
use crate::scope::FrameStack;

/// Decodes the base-20/base-5 letter encoding following the `)` in a
/// compressed proof into the sequence of integers it denotes. `-1` marks a
/// `Z` back-reference.
fn decode_letters(letters: &str) -> Result<Vec<i64>> {
    let mut out = Vec::new();
    let mut cur: i64 = 0;
    for ch in letters.chars() {
        match ch {
            'A'..='T' => {
                cur = 20 * cur + (ch as i64 - 'A' as i64 + 1);
                out.push(cur - 1);
                cur = 0;
            }
            'U'..='Y' => {
                cur = 5 * cur + (ch as i64 - 'U' as i64 + 1);
            }
            'Z' => out.push(-1),
            other => {
                return Err(mm_err!(Kind::MalformedProof, "invalid compressed proof character '{}'", other));
            }
        }
    }
    Ok(out)
}

/// Expands a compressed proof `( L1 L2 ... Lk ) LETTERS` for the assertion
/// whose conclusion is `stat`, into an ordinary sequence of labels.
///
/// `proof` is the full proof token list, starting with the literal `(`.
pub fn decompress_proof(
    fs: &FrameStack,
    labels: &LabelTable,
    stat: &Expression,
    proof: &[Token],
) -> Result<Vec<String>> {
    debug_assert_eq!(proof.first().map(|t| &**t), Some("("));

    let af = make_assertion(fs, stat);
    let mut label_list: Vec<String> = Vec::with_capacity(af.arity());
    for (_, var) in &af.mand_hyps {
        label_list.push(fs.lookup_floating(var)?);
    }
    for hyp in &af.ess_hyps {
        label_list.push(fs.lookup_essential(hyp)?);
    }
    let hyp_end = label_list.len();

    let close = proof
        .iter()
        .position(|t| &**t == ")")
        .ok_or_else(|| mm_err!(Kind::MalformedProof, "compressed proof missing ')'"))?;
    for tok in &proof[1..close] {
        label_list.push(tok.to_string());
    }
    let label_end = label_list.len();

    let letters: String = proof[close + 1..].iter().map(|t| t.as_ref()).collect();
    let proof_ints = decode_letters(&letters)?;

    let mut out: Vec<usize> = Vec::new();
    let mut subproofs: Vec<Vec<usize>> = Vec::new();
    let mut prev_proofs: Vec<Vec<usize>> = Vec::new();

    for n in proof_ints {
        if n == -1 {
            let last = prev_proofs
                .last()
                .ok_or_else(|| mm_err!(Kind::MalformedProof, "Z with no preceding step"))?
                .clone();
            subproofs.push(last);
            continue;
        }
        let n = n as usize;
        if n < hyp_end {
            out.push(n);
            prev_proofs.push(vec![n]);
        } else if n < label_end {
            out.push(n);
            let label = &label_list[n];
            let arity = labels
                .get(label)
                .and_then(|e| e.assertion())
                .map(|af| af.arity());
            match arity {
                Some(0) | None => prev_proofs.push(vec![n]),
                Some(k) => {
                    if prev_proofs.len() < k {
                        return Err(mm_err!(
                            Kind::MalformedProof,
                            "not enough prior steps for {} (needs {})",
                            label,
                            k
                        ));
                    }
                    let split_at = prev_proofs.len() - k;
                    let mut combined: Vec<usize> =
                        prev_proofs.split_off(split_at).into_iter().flatten().collect();
                    combined.push(n);
                    prev_proofs.push(combined);
                }
            }
        } else {
            let idx = n - label_end;
            let sub = subproofs
                .get(idx)
                .ok_or_else(|| mm_err!(Kind::MalformedProof, "subproof reference {} out of range", idx))?
                .clone();
            out.extend(sub.iter().copied());
            prev_proofs.push(sub);
        }
    }

    Ok(out.into_iter().map(|i| label_list[i].clone()).collect())
}
