//! Literals are atoms paired with a (boolean) polarity.
//!
//! The canonical representation is [CLiteral], made of an atom and a boolean.
//! Anything which behaves like a literal implements the [Literal] trait.
//!
//! ```rust
//! # use raft_sat::structures::literal::{CLiteral, Literal};
//! let literal = CLiteral::new(79, true);
//!
//! assert!(literal.polarity());
//! assert_eq!(literal.atom(), 79);
//! assert!(!literal.negate().polarity());
//! assert_eq!(-literal, literal.negate());
//! assert_eq!(literal.as_int(), 79);
//! ```
//!
//! Literals are ordered by atom and then polarity, with `false` strictly less than `true`.
//! So, a clause sorted by literal places the two literals of an atom next to each other, which is used to detect tautologies and duplicates.

use crate::structures::atom::Atom;

/// Something which has methods for returning an atom and a polarity, etc.
pub trait Literal: std::cmp::Ord + std::hash::Hash {
    /// A fresh literal, specified by pairing an atom with a boolean.
    fn new(atom: Atom, polarity: bool) -> Self;

    /// The negation of the literal.
    fn negate(&self) -> Self;

    /// The atom of the literal.
    fn atom(&self) -> Atom;

    /// The polarity of the literal.
    fn polarity(&self) -> bool;

    /// The literal in its integer form, with sign indicating polarity.
    fn as_int(&self) -> isize;
}

/// The canonical representation of a literal, as an atom paired with a boolean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CLiteral {
    atom: Atom,
    polarity: bool,
}

impl Literal for CLiteral {
    fn new(atom: Atom, polarity: bool) -> Self {
        CLiteral { atom, polarity }
    }

    fn negate(&self) -> Self {
        CLiteral {
            atom: self.atom,
            polarity: !self.polarity,
        }
    }

    fn atom(&self) -> Atom {
        self.atom
    }

    fn polarity(&self) -> bool {
        self.polarity
    }

    fn as_int(&self) -> isize {
        match self.polarity {
            true => self.atom as isize,
            false => -(self.atom as isize),
        }
    }
}

impl CLiteral {
    /// A dense index for the literal, with the two literals of an atom adjacent.
    ///
    /// Used to index watch lists.
    pub fn index(&self) -> usize {
        ((self.atom as usize) << 1) | (self.polarity as usize)
    }

    /// The same polarity, on a different atom.
    pub fn with_atom(&self, atom: Atom) -> Self {
        CLiteral {
            atom,
            polarity: self.polarity,
        }
    }
}

impl std::ops::Neg for CLiteral {
    type Output = CLiteral;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl From<i32> for CLiteral {
    fn from(value: i32) -> Self {
        CLiteral::new(value.unsigned_abs(), value.is_positive())
    }
}

impl std::fmt::Display for CLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_dense() {
        let p = CLiteral::new(3, false);
        assert_eq!(p.index(), 6);
        assert_eq!(p.negate().index(), 7);
    }

    #[test]
    fn ordering() {
        let mut literals = vec![CLiteral::from(2), CLiteral::from(-1), CLiteral::from(1)];
        literals.sort();
        assert_eq!(
            literals,
            vec![CLiteral::from(-1), CLiteral::from(1), CLiteral::from(2)]
        );
    }
}
