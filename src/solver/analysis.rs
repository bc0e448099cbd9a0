/*!
Analysis of a conflict, to a clause asserting the negation of the first unique implication point.

Resolution proceeds backwards along the trail from the clause in conflict, resolving on each literal of the current decision level with its reason, until a single literal of the current decision level remains.
Each atom met is bumped, and the glue of the resulting clause is the count of distinct decision levels among its literals.

Analysis of a failed assumption instead collects the assumptions from which the failure follows, following the approach of MiniSAT.
*/

use crate::{
    misc::log::targets::{self},
    solver::{ClauseKey, Solver},
    structures::{
        clause::Glue,
        literal::{CLiteral, Literal},
    },
};

/// The result of analysis.
pub(super) struct Analysis {
    /// The learnt clause, with the asserted literal first and a literal of the backjump level second.
    pub literals: Vec<CLiteral>,
    pub backjump_level: u32,
    pub glue: Glue,
}

impl Solver {
    pub(super) fn analyze(&mut self, conflict: ClauseKey) -> Analysis {
        let level = self.decision_level();
        let mut literals = vec![CLiteral::new(0, true)];
        let mut path_count = 0;
        let mut resolved: Option<CLiteral> = None;
        let mut index = self.trail.len();
        let mut reason = Some(conflict);

        loop {
            let Some(key) = reason else {
                panic!("! Resolution on a literal without a reason");
            };
            self.bump_clause(key);

            let skip = match resolved {
                Some(_) => 1,
                None => 0,
            };

            for position in skip..self.clauses[key].literals.len() {
                let literal = self.clauses[key].literals[position];
                let atom = literal.atom() as usize;
                if self.seen[atom] || self.atoms[atom].level == 0 {
                    continue;
                }

                self.seen[atom] = true;
                self.bump_atom(atom);

                match self.atoms[atom].level >= level {
                    true => path_count += 1,
                    false => literals.push(literal),
                }
            }

            loop {
                index -= 1;
                if self.seen[self.trail[index].atom() as usize] {
                    break;
                }
            }

            let literal = self.trail[index];
            resolved = Some(literal);
            reason = self.atoms[literal.atom() as usize].reason;
            self.seen[literal.atom() as usize] = false;
            path_count -= 1;

            if path_count == 0 {
                break;
            }
        }

        let Some(uip) = resolved else {
            panic!("! Analysis without resolution");
        };
        literals[0] = uip.negate();

        for literal in &literals[1..] {
            self.seen[literal.atom() as usize] = false;
        }

        let mut backjump_level = 0;
        if literals.len() > 1 {
            let mut max_position = 1;
            for position in 2..literals.len() {
                if self.level_of(literals[position].atom())
                    > self.level_of(literals[max_position].atom())
                {
                    max_position = position;
                }
            }
            literals.swap(1, max_position);
            backjump_level = self.level_of(literals[1].atom());
        }

        let mut levels = literals
            .iter()
            .map(|literal| self.level_of(literal.atom()))
            .collect::<Vec<_>>();
        levels.sort_unstable();
        levels.dedup();
        let glue = levels.len() as Glue;

        log::trace!(target: targets::ANALYSIS, "Learnt {} literals with glue {glue}, backjumping to {backjump_level}", literals.len());

        Analysis {
            literals,
            backjump_level,
            glue,
        }
    }

    /// The negation of each assumption responsible for `failed` being false, where `failed` is itself an assumption.
    pub(super) fn analyze_final(&mut self, failed: CLiteral) -> Vec<CLiteral> {
        let mut conflict = vec![failed.negate()];
        if self.decision_level() == 0 {
            return conflict;
        }

        self.seen[failed.atom() as usize] = true;

        for index in (self.trail_lim[0]..self.trail.len()).rev() {
            let literal = self.trail[index];
            let atom = literal.atom() as usize;
            if !self.seen[atom] {
                continue;
            }

            match self.atoms[atom].reason {
                None => {
                    if self.atoms[atom].level > 0 {
                        conflict.push(literal.negate());
                    }
                }

                Some(key) => {
                    for position in 1..self.clauses[key].literals.len() {
                        let other = self.clauses[key].literals[position];
                        if self.atoms[other.atom() as usize].level > 0 {
                            self.seen[other.atom() as usize] = true;
                        }
                    }
                }
            }

            self.seen[atom] = false;
        }
        self.seen[failed.atom() as usize] = false;

        conflict
    }

    /// Increases the activity of an atom, rescaling every activity if needed.
    pub(super) fn bump_atom(&mut self, atom: usize) {
        self.activity[atom] += self.activity_increment;
        if self.activity[atom] > 1e100 {
            for activity in self.activity.iter_mut() {
                *activity *= 1e-100;
            }
            self.activity_increment *= 1e-100;
        }
        self.heap.bumped(atom, &self.activity);
    }

    pub(super) fn decay_atom_activity(&mut self) {
        self.activity_increment /= self.config.activity_decay.value;
    }

    fn bump_clause(&mut self, key: ClauseKey) {
        let Some(info) = self.clauses[key].learnt.as_mut() else {
            return;
        };
        info.activity += self.clause_increment;

        if info.activity > 1e20 {
            for clause in self.clauses.iter_mut() {
                if let Some(info) = clause.learnt.as_mut() {
                    info.activity *= 1e-20;
                }
            }
            self.clause_increment *= 1e-20;
        }
    }

    pub(super) fn decay_clause_activity(&mut self) {
        self.clause_increment /= 0.999;
    }
}
