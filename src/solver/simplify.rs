/*!
Simplification of the formula on the top level.

Simplification requires the solver to be on the top level with every literal on the trail propagated, and:
- Removes each clause with a literal true on the top level.
- Removes each literal false on the top level from the remaining clauses.
- Collects the clauses removed, here or by reduction.
- Renumbers atoms so atoms without a value come first (in their existing order), followed by atoms valued on the top level.

Any clause strengthened to two literals is passed to the channel, as the clause follows from the formula.
And, each renumbering is passed to the channel, together with the count of atoms held.
*/

use crate::{
    misc::log::targets::{self},
    solver::{clauses::sorted_pair, literal_value, Solver},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

impl Solver {
    /// Simplifies the formula, returning false if the formula was found to be unsatisfiable.
    pub(super) fn simplify(&mut self) -> bool {
        if self.decision_level() > 0 {
            return true;
        }

        loop {
            if self.propagate().is_some() {
                self.ok = false;
                return false;
            }

            let mut units = Vec::default();

            for clause in self.clauses.iter_mut().filter(|clause| !clause.removed) {
                let satisfied = clause
                    .literals
                    .iter()
                    .any(|literal| literal_value(&self.atoms, *literal) == Some(true));

                if satisfied {
                    clause.removed = true;
                    continue;
                }

                let before = clause.literals.len();
                clause
                    .literals
                    .retain(|literal| self.atoms[literal.atom() as usize].value.is_none());

                match clause.literals.len() {
                    0 => self.ok = false,

                    1 => {
                        units.push(clause.literals[0]);
                        clause.removed = true;
                    }

                    2 if before > 2 => {
                        self.channel
                            .signal_new_bin_clause(clause.literals[0], clause.literals[1]);
                    }

                    _ => {}
                }
            }

            if !self.ok {
                return false;
            }
            if units.is_empty() {
                break;
            }
            for unit in units {
                if self.value_of(unit).is_none() {
                    self.assign(unit, None);
                }
            }
        }

        let before = self.clauses.len();
        self.clauses.retain(|clause| !clause.removed);
        for cell in self.atoms.iter_mut() {
            cell.reason = None;
        }

        self.renumber();

        self.counters.simplifications += 1;
        self.counters.simplify_interval = match self.counters.simplifications {
            1 => self.config.simplify_start.value,
            _ => self.counters.simplify_interval * self.config.simplify_start_growth.value,
        };
        self.counters.next_simplify =
            self.counters.total_conflicts + self.counters.simplify_interval as usize;

        log::debug!(target: targets::SIMPLIFY, "Simplification {} kept {} of {before} clauses", self.counters.simplifications, self.clauses.len());
        true
    }

    /// Renumbers atoms so those without a value come first, and rebuilds everything indexed by atom or clause.
    fn renumber(&mut self) {
        let count = self.atoms.len();

        let order = (1..count)
            .filter(|atom| self.atoms[*atom].value.is_none())
            .chain((1..count).filter(|atom| self.atoms[*atom].value.is_some()))
            .collect::<Vec<_>>();

        let mut old_to_new: Vec<Atom> = vec![0; count];
        for (position, old) in order.iter().enumerate() {
            old_to_new[*old] = (position + 1) as Atom;
        }

        let identity = order
            .iter()
            .enumerate()
            .all(|(position, old)| position + 1 == *old);

        if !identity {
            let renumber = |literal: &mut CLiteral| {
                *literal = literal.with_atom(old_to_new[literal.atom() as usize]);
            };

            self.atoms = std::iter::once(0)
                .chain(order.iter().copied())
                .map(|old| self.atoms[old].clone())
                .collect();

            self.activity = std::iter::once(0)
                .chain(order.iter().copied())
                .map(|old| self.activity[old])
                .collect();

            self.trail.iter_mut().for_each(renumber);
            for clause in self.clauses.iter_mut() {
                clause.literals.iter_mut().for_each(renumber);
            }

            for inner in self.outer_to_inner.iter_mut() {
                *inner = old_to_new[*inner as usize];
            }

            let inner_to_outer = self.atoms.iter().map(|cell| cell.outer).collect::<Vec<_>>();
            self.channel
                .update_vars(&self.outer_to_inner, &inner_to_outer);

            self.heap.clear();
            for atom in 1..count {
                let cell = &self.atoms[atom];
                if cell.decision && cell.value.is_none() {
                    self.heap.insert(atom, &self.activity);
                }
            }

            log::debug!(target: targets::SIMPLIFY, "Renumbered {} atoms", count - 1);
        }

        for list in self.watches.iter_mut() {
            list.clear();
        }
        self.binaries.clear();
        for key in 0..self.clauses.len() {
            let literals = &self.clauses[key].literals;
            if literals.len() == 2 {
                self.binaries.insert(sorted_pair(literals[0], literals[1]));
            }
            self.watch(key);
        }

        self.channel.save_on_var_memory(count - 1);
    }
}
