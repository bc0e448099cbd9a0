/*!
Addition of clauses to a solver.

Each clause is translated to the inner numbering, and then simplified against the top level of the valuation:
- Duplicate literals are removed, and a clause containing some literal and its negation is dropped, as it is satisfied on every valuation.
- A clause with some literal true on the top level is dropped, and literals false on the top level are removed.

After which, an empty clause makes the formula unsatisfiable, a unit clause is added to the trail, and any other clause is stored and watched.

Xor clauses are first normalised to a set of atoms and a parity, with atoms valued on the top level folded into the parity.
An xor of at most [xor_cut](crate::config::Config::xor_cut) atoms is expanded directly, to the clauses forbidding each valuation of the wrong parity.
A longer xor is cut into a chain of such expansions, each link joined to the next through a fresh auxiliary atom.
*/

use crate::{
    misc::log::targets::{self},
    solver::{ClauseKey, LearntInfo, Solver, StoredClause},
    structures::{
        atom::Atom,
        clause::{Clause, ClauseKind, Glue},
        literal::{CLiteral, Literal},
    },
    sync::Absorption,
    types::err::{self},
};

/// The result of simplifying a clause against the top level.
enum Simplified {
    Satisfied,
    Empty,
    Literals(Vec<CLiteral>),
}

impl Solver {
    /// Adds a clause given in the shared numbering, returning false if the formula is now unsatisfiable.
    pub(super) fn add_external_clause(&mut self, clause: &Clause) -> Result<bool, err::ErrorKind> {
        if self.decision_level() > 0 {
            return Err(err::ClauseDBError::DecisionMade.into());
        }

        let literals = clause
            .literals()
            .iter()
            .map(|literal| self.to_inner(*literal))
            .collect::<Result<Vec<_>, _>>()?;

        if !self.ok {
            return Ok(false);
        }

        match clause.kind() {
            ClauseKind::Original => {
                self.formula.push(clause.clone());
                Ok(self.add_inner_clause(literals, None))
            }

            ClauseKind::Learnt { glue, activity } => Ok(self.add_inner_clause(
                literals,
                Some(LearntInfo {
                    glue,
                    activity: activity as f64,
                }),
            )),

            ClauseKind::Xor { parity } => {
                self.formula.push(clause.clone());
                self.add_xor(literals, parity)
            }
        }
    }

    /// Sorts, dedupes, and simplifies `literals` against the top level.
    fn simplify_against_top(&self, mut literals: Vec<CLiteral>) -> Simplified {
        literals.sort_unstable();
        literals.dedup();

        if literals
            .windows(2)
            .any(|pair| pair[0].atom() == pair[1].atom())
        {
            return Simplified::Satisfied;
        }

        let mut kept = Vec::with_capacity(literals.len());
        for literal in literals {
            match self.value_of(literal) {
                Some(true) if self.level_of(literal.atom()) == 0 => return Simplified::Satisfied,
                Some(false) if self.level_of(literal.atom()) == 0 => {}
                _ => kept.push(literal),
            }
        }

        match kept.is_empty() {
            true => Simplified::Empty,
            false => Simplified::Literals(kept),
        }
    }

    /// Adds a clause in the inner numbering, on the top level.
    fn add_inner_clause(&mut self, literals: Vec<CLiteral>, learnt: Option<LearntInfo>) -> bool {
        match self.simplify_against_top(literals) {
            Simplified::Satisfied => true,

            Simplified::Empty => {
                log::info!(target: targets::PROPAGATION, "Empty clause added");
                self.ok = false;
                false
            }

            Simplified::Literals(literals) if literals.len() == 1 => {
                self.assign(literals[0], None);
                if self.propagate().is_some() {
                    self.ok = false;
                }
                self.ok
            }

            Simplified::Literals(literals) => {
                self.store_clause(literals, learnt);
                true
            }
        }
    }

    /// Stores and watches a clause of at least two literals, the first two of which must be watchable.
    pub(super) fn store_clause(
        &mut self,
        literals: Vec<CLiteral>,
        learnt: Option<LearntInfo>,
    ) -> ClauseKey {
        if literals.len() == 2 {
            self.binaries.insert(sorted_pair(literals[0], literals[1]));
        }

        let key = self.clauses.len();
        self.clauses.push(StoredClause {
            literals,
            learnt,
            removed: false,
        });
        self.watch(key);
        key
    }

    /// Adds a learnt clause from analysis, asserting its first literal.
    ///
    /// The solver must be at the backjump level of the clause.
    pub(super) fn learn(&mut self, literals: Vec<CLiteral>, glue: Glue) {
        match literals.len() {
            1 => {
                self.assign(literals[0], None);
            }

            length => {
                if length == 2 {
                    self.channel.signal_new_bin_clause(literals[0], literals[1]);
                } else {
                    self.channel.signal_new_long_clause(&literals);
                }

                let asserted = literals[0];
                let key = self.store_clause(
                    literals,
                    Some(LearntInfo {
                        glue,
                        activity: self.clause_increment,
                    }),
                );
                self.assign(asserted, Some(key));
            }
        }
    }

    /// Adds an xor over `literals` of the given parity.
    fn add_xor(&mut self, literals: Vec<CLiteral>, parity: bool) -> Result<bool, err::ErrorKind> {
        let mut parity = parity;
        let mut atoms: Vec<Atom> = Vec::with_capacity(literals.len());

        // ¬x is x ⊕ 1, and x ⊕ x is 0.
        for literal in literals {
            if !literal.polarity() {
                parity = !parity;
            }
            atoms.push(literal.atom());
        }
        atoms.sort_unstable();

        let mut distinct: Vec<Atom> = Vec::with_capacity(atoms.len());
        for atom in atoms {
            match distinct.last() {
                Some(last) if *last == atom => {
                    distinct.pop();
                }
                _ => distinct.push(atom),
            }
        }

        let mut free = Vec::with_capacity(distinct.len());
        for atom in distinct {
            let cell = &self.atoms[atom as usize];
            match (cell.value, cell.level) {
                (Some(value), 0) => {
                    if value {
                        parity = !parity;
                    }
                }
                _ => free.push(atom),
            }
        }

        let cut = self.config.xor_cut.value.max(3);
        while free.len() > cut {
            let link = free.drain(..cut - 1).collect::<Vec<_>>();
            let joint = self.new_atom(true, true)?;
            log::trace!(target: targets::PROPAGATION, "Xor cut through auxiliary atom {joint}");

            let mut with_joint = link;
            with_joint.push(joint);
            if !self.expand_xor(&with_joint, false) {
                return Ok(false);
            }
            free.insert(0, joint);
        }

        Ok(self.expand_xor(&free, parity))
    }

    /// Adds the clauses forbidding each valuation of `atoms` of the wrong parity.
    fn expand_xor(&mut self, atoms: &[Atom], parity: bool) -> bool {
        if atoms.is_empty() {
            if parity {
                self.ok = false;
            }
            return self.ok;
        }

        for pattern in 0_u32..(1 << atoms.len()) {
            // A valuation with an odd count of true atoms has parity true.
            if (pattern.count_ones() % 2 == 1) == parity {
                continue;
            }

            let clause = atoms
                .iter()
                .enumerate()
                .map(|(position, atom)| CLiteral::new(*atom, (pattern >> position) & 1 == 0))
                .collect::<Vec<_>>();

            if !self.add_inner_clause(clause, None) {
                return false;
            }
        }
        true
    }

    /// Absorbs a unit from some peer or backend.
    pub(super) fn absorb_top_unit(&mut self, literal: CLiteral) -> Absorption {
        match self.value_of(literal) {
            Some(true) => Absorption::Redundant,
            Some(false) => {
                self.ok = false;
                Absorption::Contradiction
            }
            None => {
                self.assign(literal, None);
                Absorption::Fresh
            }
        }
    }

    /// Absorbs a learnt clause from some peer or backend.
    pub(super) fn absorb_top_clause(&mut self, literals: &[CLiteral]) -> Absorption {
        match self.simplify_against_top(literals.to_vec()) {
            Simplified::Satisfied => Absorption::Redundant,

            Simplified::Empty => {
                self.ok = false;
                Absorption::Contradiction
            }

            Simplified::Literals(literals) if literals.len() == 1 => {
                self.absorb_top_unit(literals[0])
            }

            Simplified::Literals(literals) => {
                if literals.len() == 2
                    && self
                        .binaries
                        .contains(&sorted_pair(literals[0], literals[1]))
                {
                    return Absorption::Redundant;
                }

                let glue = literals.len() as Glue;
                self.store_clause(
                    literals,
                    Some(LearntInfo {
                        glue,
                        activity: self.clause_increment,
                    }),
                );
                Absorption::Fresh
            }
        }
    }
}

/// The pair, in order.
pub(super) fn sorted_pair(a: CLiteral, b: CLiteral) -> (CLiteral, CLiteral) {
    match a <= b {
        true => (a, b),
        false => (b, a),
    }
}
