/*!
Clauses, as passed to an engine.

A [Clause] is an ordered sequence of literals together with metadata, and the [kind](ClauseKind) of the clause says how the literals are to be read:
- An [original](ClauseKind::Original) clause is a disjunction, and part of the formula.
- A [learnt](ClauseKind::Learnt) clause is a disjunction known to follow from the formula, carrying a glue and an activity.
- An [xor](ClauseKind::Xor) clause requires the exclusive disjunction of its literals to equal a parity.

Every kind of clause passes through the same [broadcast](crate::portfolio::PortfolioCoordinator::add_clause) to the instances of a portfolio.

```rust
# use raft_sat::structures::clause::{Clause, ClauseKind};
# use raft_sat::structures::literal::CLiteral;
let clause = Clause::original(vec![CLiteral::from(1), CLiteral::from(-2)])
    .in_group(3)
    .named("p_or_not_q");

assert_eq!(clause.kind(), ClauseKind::Original);
assert_eq!(clause.group(), 3);
assert_eq!(clause.name(), Some("p_or_not_q"));
assert_eq!(clause.as_dimacs(), "1 -2 0");
```
*/

use crate::structures::literal::{CLiteral, Literal};

/// The glue of a clause, aka. its literal block distance.
pub type Glue = u32;

/// How the literals of a clause are to be read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClauseKind {
    /// A disjunction of literals which is part of the formula.
    Original,

    /// A disjunction of literals which follows from the formula.
    Learnt {
        /// An estimate of how useful the clause is for propagation, lower is better.
        glue: Glue,

        /// Activity, in the sense of MiniSAT.
        activity: f32,
    },

    /// The exclusive disjunction of the literals equals the parity.
    Xor {
        /// The required parity.
        parity: bool,
    },
}

/// A sequence of literals together with metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    literals: Vec<CLiteral>,
    kind: ClauseKind,
    group: u32,
    name: Option<String>,
}

impl Clause {
    /// A clause of the given kind, in group zero and without a name.
    pub fn new(literals: Vec<CLiteral>, kind: ClauseKind) -> Self {
        Clause {
            literals,
            kind,
            group: 0,
            name: None,
        }
    }

    /// An original clause.
    pub fn original(literals: Vec<CLiteral>) -> Self {
        Clause::new(literals, ClauseKind::Original)
    }

    /// A learnt clause.
    pub fn learnt(literals: Vec<CLiteral>, glue: Glue, activity: f32) -> Self {
        Clause::new(literals, ClauseKind::Learnt { glue, activity })
    }

    /// An xor clause.
    pub fn xor(literals: Vec<CLiteral>, parity: bool) -> Self {
        Clause::new(literals, ClauseKind::Xor { parity })
    }

    /// Places the clause in `group`.
    pub fn in_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    /// Names the clause.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn literals(&self) -> &[CLiteral] {
        &self.literals
    }

    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn size(&self) -> usize {
        self.literals.len()
    }

    /// The clause in DIMACS form, with xor clauses prefixed by `x` and parity folded into the first literal.
    pub fn as_dimacs(&self) -> String {
        let mut literals = self.literals.clone();
        let prefix = match self.kind {
            ClauseKind::Xor { parity } => {
                if !parity {
                    if let Some(first) = literals.first_mut() {
                        *first = first.negate();
                    }
                }
                "x"
            }
            _ => "",
        };

        let mut the_string = String::from(prefix);
        for literal in &literals {
            the_string.push_str(&format!("{literal} "));
        }
        the_string.push('0');
        the_string
    }
}

/// The literals of a slice, in DIMACS form.
pub fn dimacs_line(literals: &[CLiteral]) -> String {
    let mut the_string = String::default();
    for literal in literals {
        the_string.push_str(&format!("{literal} "));
    }
    the_string.push('0');
    the_string
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_dimacs_folds_parity() {
        let odd = Clause::xor(vec![CLiteral::from(1), CLiteral::from(2)], true);
        assert_eq!(odd.as_dimacs(), "x1 2 0");

        let even = Clause::xor(vec![CLiteral::from(1), CLiteral::from(2)], false);
        assert_eq!(even.as_dimacs(), "x-1 2 0");
    }
}
