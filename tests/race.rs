mod common;

use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use raft_sat::{
    config::Config,
    engine::Engine,
    portfolio::{PortfolioCoordinator, SolveState},
    reports::Report,
    structures::{
        atom::Atom,
        clause::Clause,
        literal::{CLiteral, Literal},
    },
    sync::{ClauseSyncChannel, SyncStats},
    types::err::{self},
};

use common::init_logging;

/// Instances seeded with this finish at once.
const FAST_SEED: u64 = 1;

/// An engine which finishes at once if seeded with [FAST_SEED], and otherwise waits to be interrupted.
struct RaceEngine {
    seed: u64,
    atoms: Atom,
    interrupt: Arc<AtomicBool>,
    model: Vec<Option<bool>>,
    conflict: Vec<CLiteral>,
    verdict: Report,
    saw_interrupt: bool,
}

impl Engine for RaceEngine {
    fn from_config(config: Config, _channel: ClauseSyncChannel) -> Self {
        RaceEngine {
            seed: config.seed.value,
            atoms: 0,
            interrupt: Arc::new(AtomicBool::new(false)),
            model: Vec::default(),
            conflict: Vec::default(),
            verdict: Report::Unsatisfiable,
            saw_interrupt: false,
        }
    }

    fn solve(&mut self, assumptions: &[CLiteral]) -> Result<Report, err::ErrorKind> {
        self.saw_interrupt = false;
        self.model.clear();
        self.conflict.clear();

        if self.seed == FAST_SEED {
            match self.verdict {
                Report::Satisfiable => {
                    self.model = vec![None];
                    self.model.extend((1..=self.atoms).map(|atom| Some(atom % 2 == 1)));
                }
                _ => self.conflict = assumptions.iter().map(|literal| -*literal).collect(),
            }
            return Ok(self.verdict);
        }

        let start = Instant::now();
        while !self.need_to_interrupt() {
            if start.elapsed() > Duration::from_secs(30) {
                panic!("never interrupted");
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        self.saw_interrupt = true;
        Ok(Report::Unknown)
    }

    fn fresh_atom(&mut self, _decision: bool) -> Result<Atom, err::ErrorKind> {
        self.atoms += 1;
        Ok(self.atoms)
    }

    fn add_clause(&mut self, clause: &Clause) -> bool {
        if clause.literals().is_empty() {
            return false;
        }
        if clause.size() == 1 && clause.literals()[0].as_int() > 0 {
            self.verdict = Report::Satisfiable;
        }
        true
    }

    fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    fn model(&self) -> &[Option<bool>] {
        &self.model
    }

    fn conflict(&self) -> &[CLiteral] {
        &self.conflict
    }

    fn print_stats(&self, _peer_count: usize) {}

    fn dump_sorted_learnts(&self, _path: &Path, _max_size: usize) -> Result<(), err::ErrorKind> {
        Ok(())
    }

    fn dump_original_clauses(
        &self,
        _path: &Path,
        _also_learnt_binaries: bool,
    ) -> Result<(), err::ErrorKind> {
        Ok(())
    }

    fn set_atom_name(&mut self, _atom: Atom, _name: &str) {}

    fn sync_stats(&self) -> SyncStats {
        SyncStats::default()
    }
}

fn race(width: usize) -> PortfolioCoordinator<RaceEngine> {
    match PortfolioCoordinator::<RaceEngine>::new(width, Config::default()) {
        Ok(portfolio) => portfolio,
        Err(e) => panic!("{e}"),
    }
}

mod first_finisher {
    use super::*;

    #[test]
    fn fast_instance_decides() {
        init_logging();
        for width in 2..=5 {
            let mut portfolio = race(width);
            for _ in 0..4 {
                assert!(portfolio.new_var(true).is_ok());
            }

            assert_eq!(portfolio.solve(), Ok(Report::Unsatisfiable));
            assert_eq!(portfolio.decider(), Some(FAST_SEED as usize));
            assert_eq!(portfolio.state(), SolveState::Done);

            for (index, engine) in portfolio.engines().iter().enumerate() {
                if index != FAST_SEED as usize {
                    assert!(engine.need_to_interrupt());
                    assert!(engine.saw_interrupt);
                }
            }
        }
    }

    #[test]
    fn model_comes_from_decider() {
        let mut portfolio = race(3);
        for _ in 0..3 {
            assert!(portfolio.new_var(true).is_ok());
        }
        assert!(portfolio.add_clause(vec![CLiteral::from(2)]));

        assert_eq!(portfolio.solve(), Ok(Report::Satisfiable));
        assert_eq!(
            portfolio.model(),
            &[None, Some(true), Some(false), Some(true)]
        );
        assert_eq!(portfolio.value_of(2), Some(false));
        assert_eq!(portfolio.value_of(9), None);
    }

    #[test]
    fn conflict_comes_from_decider() {
        let mut portfolio = race(2);
        for _ in 0..2 {
            assert!(portfolio.new_var(true).is_ok());
        }

        let assumptions = [CLiteral::from(1), CLiteral::from(-2)];
        assert_eq!(
            portfolio.solve_with_assumptions(&assumptions),
            Ok(Report::Unsatisfiable)
        );
        assert_eq!(portfolio.conflict(), &[CLiteral::from(-1), CLiteral::from(2)]);
    }

    #[test]
    fn repeated_solves_reset_the_race() {
        let mut portfolio = race(3);
        for _ in 0..3 {
            assert_eq!(portfolio.solve(), Ok(Report::Unsatisfiable));
            assert_eq!(portfolio.decider(), Some(FAST_SEED as usize));
        }
    }

    #[test]
    fn single_instance_waits_for_nobody() {
        // Instance zero of one is seeded zero, and so waits for an interrupt.
        let mut portfolio = race(1);
        let handle = portfolio.interrupt_handle();
        let done = Arc::new(AtomicBool::new(false));

        let interrupter = {
            let done = done.clone();
            std::thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    handle.interrupt();
                    std::thread::sleep(Duration::from_millis(5));
                }
            })
        };

        assert_eq!(portfolio.solve(), Ok(Report::Unknown));
        done.store(true, Ordering::Relaxed);
        assert!(interrupter.join().is_ok());

        assert_eq!(portfolio.decider(), Some(0));
    }
}

mod rejection {
    use super::*;

    #[test]
    fn empty_clause_is_refused() {
        let mut portfolio = race(3);
        assert!(!portfolio.add_clause(Vec::default()));
        assert!(portfolio.add_clause(vec![CLiteral::from(-1)]));
    }
}
