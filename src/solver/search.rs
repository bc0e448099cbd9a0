/*!
The search loop of a solver.

Each solve begins on the top level with an exchange through the channel, and (on the first solve, if configured) a simplification.
Then, the loop alternates propagation with either analysis of a conflict or a decision, until a verdict is reached or the solve is interrupted.

# Assumptions

Assumptions are made as the first decisions, one decision level for each assumption.
An assumption which already holds opens an empty decision level, to keep levels and assumptions aligned.
An assumption which is already false ends the solve, with a [conflict](crate::engine::Engine::conflict) from [analyze_final](Solver::analyze_final).

# Between conflicts

After each conflict:
- The learnt clauses are reduced, every [reduction_interval](crate::config::Config::reduction_interval) conflicts.
- The solver restarts, if the luby sequence calls for a restart.
- The solver restarts and exchanges through the channel, every [sync_every](crate::config::Config::sync_every) conflicts.

And, on reaching the top level with propagation exhausted, the solver simplifies if enough conflicts have passed since the last simplification.
*/

use std::{sync::atomic::Ordering, time::Instant};

use crate::{
    misc::log::targets::{self},
    reports::Report,
    solver::Solver,
    structures::literal::CLiteral,
    types::err::{self},
};

impl Solver {
    pub(super) fn search(&mut self, assumptions: &[CLiteral]) -> Result<Report, err::ErrorKind> {
        let start = Instant::now();
        self.counters.solves += 1;
        self.model.clear();
        self.conflict.clear();
        self.backjump(0);

        let report = self.search_loop(assumptions, start)?;

        if report == Report::Satisfiable {
            self.model = vec![None; self.external_to_outer.len()];
            for (external, outer) in self.external_to_outer.iter().enumerate().skip(1) {
                let inner = self.outer_to_inner[*outer as usize];
                self.model[external] = self.atoms[inner as usize].value;
            }
        }

        self.backjump(0);
        self.counters.time += start.elapsed();

        if self.config.verbosity.value > 1 {
            println!("c solve {} finished: {report}", self.counters.solves);
        }
        Ok(report)
    }

    /// The loop, with assumptions in the shared numbering as simplification may renumber atoms during the loop.
    fn search_loop(
        &mut self,
        assumptions: &[CLiteral],
        start: Instant,
    ) -> Result<Report, err::ErrorKind> {
        if !self.ok {
            return Ok(Report::Unsatisfiable);
        }

        if self.config.pre_simplify.value && self.counters.solves == 1 && !self.simplify() {
            return Ok(Report::Unsatisfiable);
        }

        if !self.sync() {
            self.ok = false;
            return Ok(Report::Unsatisfiable);
        }

        let time_limit = self.config.time_limit();

        loop {
            if self.interrupt.load(Ordering::Relaxed) {
                log::debug!("Interrupted at conflict {}", self.counters.total_conflicts);
                return Ok(Report::Unknown);
            }

            if time_limit.is_some_and(|limit| start.elapsed() > limit) {
                log::debug!("Time limit reached at conflict {}", self.counters.total_conflicts);
                return Ok(Report::Unknown);
            }

            match self.propagate() {
                Some(conflict) => {
                    self.counters.total_conflicts += 1;
                    self.counters.fresh_conflicts += 1;
                    self.counters.conflicts_since_sync += 1;

                    if self.decision_level() == 0 {
                        self.ok = false;
                        return Ok(Report::Unsatisfiable);
                    }

                    let analysis = self.analyze(conflict);
                    self.backjump(analysis.backjump_level);
                    self.learn(analysis.literals, analysis.glue);

                    self.decay_atom_activity();
                    self.decay_clause_activity();

                    if !self.after_conflict() {
                        self.ok = false;
                        return Ok(Report::Unsatisfiable);
                    }
                }

                None => {
                    if self.decision_level() == 0
                        && self.counters.total_conflicts >= self.counters.next_simplify
                        && !self.simplify()
                    {
                        return Ok(Report::Unsatisfiable);
                    }

                    let mut decision = None;
                    while (self.decision_level() as usize) < assumptions.len() {
                        let assumption = self.to_inner(assumptions[self.decision_level() as usize])?;
                        match self.value_of(assumption) {
                            Some(true) => self.new_decision_level(),

                            Some(false) => {
                                let conflict = self.analyze_final(assumption);
                                self.conflict = conflict
                                    .into_iter()
                                    .filter_map(|literal| self.to_external(literal))
                                    .collect();
                                return Ok(Report::Unsatisfiable);
                            }

                            None => {
                                decision = Some(assumption);
                                break;
                            }
                        }
                    }

                    let decision = match decision {
                        Some(assumption) => assumption,
                        None => match self.make_decision() {
                            Some(decision) => decision,
                            None => return Ok(Report::Satisfiable),
                        },
                    };

                    self.new_decision_level();
                    self.assign(decision, None);
                }
            }
        }
    }

    /// Scheduled actions after a conflict, returning false if the formula was found to be unsatisfiable.
    fn after_conflict(&mut self) -> bool {
        if self.counters.total_conflicts % self.config.reduction_interval.value as usize == 0 {
            self.reduce();
        }

        let restart_due = self.config.restart.value
            && self.counters.fresh_conflicts
                >= self
                    .counters
                    .luby
                    .current()
                    .saturating_mul(self.config.luby_u.value);

        let sync_due = self.counters.conflicts_since_sync >= self.config.sync_every.value;

        if restart_due {
            self.counters.luby.next();
            self.counters.restarts += 1;
        }

        if restart_due || sync_due {
            self.counters.fresh_conflicts = 0;
            self.backjump(0);
        }

        if sync_due {
            self.counters.conflicts_since_sync = 0;
            if self.propagate().is_some() {
                return false;
            }
            if !self.sync() {
                log::info!(target: targets::SYNC, "Contradiction found through sync");
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        engine::Engine,
        structures::clause::Clause,
        sync::ClauseSyncChannel,
    };

    use super::*;

    fn solver_with(atoms: usize, config: Config) -> Solver {
        let mut solver = Solver::from_config(config, ClauseSyncChannel::default());
        for _ in 0..atoms {
            let _ = solver.fresh_atom(true);
        }
        solver
    }

    fn clause(literals: &[i32]) -> Clause {
        Clause::original(literals.iter().map(|l| CLiteral::from(*l)).collect())
    }

    #[test]
    fn pigeons_do_not_fit() {
        // Three pigeons, two holes: atom 2p + h - 2 is pigeon p in hole h.
        let mut solver = solver_with(6, Config::default());
        let var = |p: i32, h: i32| 2 * p + h - 2;

        for p in 1..=3 {
            assert!(solver.add_clause(&clause(&[var(p, 1), var(p, 2)])));
        }
        for h in 1..=2 {
            for p in 1..=3 {
                for q in (p + 1)..=3 {
                    let _ = solver.add_clause(&clause(&[-var(p, h), -var(q, h)]));
                }
            }
        }

        assert_eq!(solver.solve(&[]), Ok(Report::Unsatisfiable));
        assert!(solver.counters().total_conflicts > 0);
    }

    #[test]
    fn assumptions_are_released() {
        let mut solver = solver_with(3, Config::default());
        assert!(solver.add_clause(&clause(&[-1, 2])));
        assert!(solver.add_clause(&clause(&[-2, 3])));

        assert_eq!(
            solver.solve(&[CLiteral::from(1), CLiteral::from(-3)]),
            Ok(Report::Unsatisfiable)
        );
        let mut conflict = solver.conflict().to_vec();
        conflict.sort();
        assert_eq!(conflict, vec![CLiteral::from(-1), CLiteral::from(3)]);

        assert_eq!(solver.solve(&[CLiteral::from(1)]), Ok(Report::Satisfiable));
        assert_eq!(solver.model()[3], Some(true));
    }

    #[test]
    fn interrupt_gives_unknown() {
        let mut solver = solver_with(2, Config::default());
        solver.set_need_to_interrupt();
        assert_eq!(solver.solve(&[]), Ok(Report::Unknown));
    }

    #[test]
    fn long_xor_is_cut() {
        let mut config = Config::default();
        config.xor_cut.value = 3;
        let mut solver = solver_with(6, config);

        let literals = (1..=6).map(CLiteral::from).collect::<Vec<_>>();
        assert!(solver.add_clause(&Clause::xor(literals, true)));
        assert!(solver.atom_count() > solver.external_atom_count());

        assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));
        let ones = solver.model()[1..=6]
            .iter()
            .filter(|value| **value == Some(true))
            .count();
        assert_eq!(ones % 2, 1);
        assert_eq!(solver.model().len(), 7);
    }
}
