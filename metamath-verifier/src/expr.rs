//! Tokens and expressions: the core data model the verifier operates over.

use std::fmt;
use std::rc::Rc;

/// An opaque whitespace-delimited identifier.
///
/// Interned as a reference-counted string slice so that the many repeated
/// occurrences of the same token across a database (typecodes above all)
/// don't each allocate their own `String`.
pub type Token = Rc<str>;

/// An ordered sequence of tokens. The first token is conventionally a
/// constant (the statement's typecode).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Expression(pub Vec<Token>);

impl Expression {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Expression(tokens)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    #[must_use]
    pub fn typecode(&self) -> Option<&Token> {
        self.0.first()
    }

    #[must_use]
    pub fn tail(&self) -> &[Token] {
        &self.0[1.min(self.0.len())..]
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tok in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(tok)?;
        }
        Ok(())
    }
}

impl FromIterator<Token> for Expression {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Expression(iter.into_iter().collect())
    }
}

/// Interns a bare `&str` as a [`Token`]. Cheap to call repeatedly; callers
/// that already hold a `Token` should clone it instead (an `Rc` bump) rather
/// than re-intern through here.
#[must_use]
pub fn intern(s: &str) -> Token {
    Rc::from(s)
}
