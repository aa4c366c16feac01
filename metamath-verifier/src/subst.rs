//! The substitution engine: applies a token-to-expression map to an
//! expression, expanding variables and leaving constants unchanged.

use crate::expr::{Expression, Token};
use crate::scope::FrameStack;
use std::collections::HashMap;

/// A token-to-expression substitution map, built from mandatory variables
/// matched against the stack entries a proof step consumes.
pub type Subst = HashMap<Token, Expression>;

/// Applies `subst` to `expr`: constants are copied unchanged, and any token
/// present in `subst` is replaced by its mapped expression. Identity when
/// `subst` is empty; homomorphic over concatenation (applying to `a ++ b`
/// equals applying to `a` concatenated with applying to `b`) because each
/// token is substituted independently of its neighbours.
#[must_use]
pub fn apply_subst(expr: &Expression, subst: &Subst) -> Expression {
    let mut out = Vec::with_capacity(expr.as_slice().len());
    for tok in expr.as_slice() {
        match subst.get(tok) {
            Some(repl) => out.extend(repl.as_slice().iter().cloned()),
            None => out.push(tok.clone()),
        }
    }
    Expression::new(out)
}

/// Returns the variables appearing in `expr`, in order of first occurrence,
/// de-duplicated, as judged active by `fs`.
#[must_use]
pub fn find_vars(fs: &FrameStack, expr: &Expression) -> Vec<Token> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for tok in expr.as_slice() {
        if fs.lookup_var(tok) && seen.insert(tok.clone()) {
            out.push(tok.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::intern;

    #[test]
    fn identity_on_empty_subst() {
        let e = Expression::new(vec![intern("wff"), intern("p")]);
        let out = apply_subst(&e, &Subst::new());
        assert_eq!(out, e);
    }

    #[test]
    fn substitutes_variables_and_copies_constants() {
        let mut subst = Subst::new();
        subst.insert(intern("p"), Expression::new(vec![intern("wff"), intern("x")]));
        let e = Expression::new(vec![intern("wff"), intern("p")]);
        let out = apply_subst(&e, &subst);
        assert_eq!(out.as_slice(), &[intern("wff"), intern("wff"), intern("x")]);
    }

    #[test]
    fn homomorphic_over_concatenation() {
        let mut subst = Subst::new();
        subst.insert(intern("p"), Expression::new(vec![intern("x"), intern("y")]));
        let a = Expression::new(vec![intern("p")]);
        let b = Expression::new(vec![intern("wff"), intern("p")]);
        let combined = Expression::new(
            a.as_slice()
                .iter()
                .chain(b.as_slice())
                .cloned()
                .collect(),
        );
        let lhs = apply_subst(&combined, &subst);
        let mut rhs: Vec<Token> = apply_subst(&a, &subst).as_slice().to_vec();
        rhs.extend(apply_subst(&b, &subst).as_slice().iter().cloned());
        assert_eq!(lhs.as_slice(), rhs.as_slice());
    }
}
