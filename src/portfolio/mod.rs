/*!
A portfolio of diversified engines, raced against a single formula.

The [PortfolioCoordinator] owns each instance of an engine, and:
- Derives a [configuration](diversify) for each instance from a base configuration.
- Binds the [channel](crate::sync::ClauseSyncChannel) of each instance to one [SharedClausePool], if sharing is configured.
- Broadcasts each fresh atom, clause, and name to every instance, in lockstep.
- Races the instances on a solve, and takes the result of the first to finish.

# Solves

A solve launches one scoped worker thread for each instance.
The first worker to return is the decider, and the decider interrupts each peer and waits for each peer to return (see [board]).
The verdict, model, and conflict of the decider are then the result of the solve, and everything else is discarded.

After a solve the pool is reset, and each channel republishes its top level on the next solve.

# Example

```rust
# use raft_sat::config::Config;
# use raft_sat::portfolio::PortfolioCoordinator;
# use raft_sat::reports::Report;
# use raft_sat::structures::literal::CLiteral;
let mut portfolio: PortfolioCoordinator = PortfolioCoordinator::new(3, Config::default()).unwrap();

let p = portfolio.new_var(true).unwrap() as i32;
let q = portfolio.new_var(true).unwrap() as i32;

assert!(portfolio.add_clause(vec![CLiteral::from(p), CLiteral::from(q)]));
assert!(portfolio.add_clause(vec![CLiteral::from(-p), CLiteral::from(q)]));

assert_eq!(portfolio.solve(), Ok(Report::Satisfiable));
assert_eq!(portfolio.value_of(q as u32), Some(true));
assert!(portfolio.decider().is_some());
```
*/

pub mod board;
pub mod diversify;

use std::{
    panic::{self, AssertUnwindSafe},
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    config::Config,
    engine::Engine,
    misc::log::targets::{self},
    reports::Report,
    solver::Solver,
    structures::{
        atom::Atom,
        clause::{Clause, Glue},
        literal::CLiteral,
    },
    sync::{ClauseSyncChannel, SharedClausePool, SyncStats},
    transport::SyncBackend,
    types::err::{self},
};

use board::FinishBoard;
pub use board::SolveState;

/// A handle to the interrupt flags of a portfolio, usable while the portfolio solves.
#[derive(Clone, Debug)]
pub struct InterruptHandle {
    flags: Vec<Arc<AtomicBool>>,
}

impl InterruptHandle {
    /// Asks every instance to stop, without waiting.
    pub fn interrupt(&self) {
        for flag in &self.flags {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

/// What the decider of a solve leaves behind.
struct Harvest {
    report: Result<Report, err::ErrorKind>,
    model: Vec<Option<bool>>,
    conflict: Vec<CLiteral>,
}

/// The coordinator of a portfolio.
pub struct PortfolioCoordinator<E: Engine = Solver> {
    engines: Vec<E>,
    interrupts: Vec<Arc<AtomicBool>>,
    pool: Arc<SharedClausePool>,

    state: SolveState,
    decider: Option<usize>,
    model: Vec<Option<bool>>,
    conflict: Vec<CLiteral>,
}

impl<E: Engine> PortfolioCoordinator<E> {
    /// A portfolio of `width` instances, diversified from `config`.
    pub fn new(width: usize, config: Config) -> Result<Self, err::ErrorKind> {
        Self::with_backends(width, config, |_| None)
    }

    /// A portfolio of `width` instances, where the channel of instance `i` is composed with the backend given by `factory(i)`, if any.
    pub fn with_backends(
        width: usize,
        config: Config,
        mut factory: impl FnMut(usize) -> Option<Box<dyn SyncBackend>>,
    ) -> Result<Self, err::ErrorKind> {
        if width == 0 {
            return Err(err::ConfigError::Width.into());
        }

        if config.verbosity.value > 0 {
            println!("c Using {width} threads");
        }
        log::info!(target: targets::PORTFOLIO, "Using {width} threads");

        let pool = Arc::new(SharedClausePool::default());

        let mut engines = Vec::with_capacity(width);
        for (index, instance_config) in diversify::diversify(width, &config).into_iter().enumerate() {
            let channel = match config.sharing.value {
                true => ClauseSyncChannel::new(pool.clone()),
                false => ClauseSyncChannel::default(),
            };
            let channel = match factory(index) {
                Some(backend) => channel.with_backend(backend),
                None => channel,
            };
            engines.push(E::from_config(instance_config, channel));
        }

        let interrupts = engines.iter().map(|engine| engine.interrupt_flag()).collect();

        Ok(PortfolioCoordinator {
            engines,
            interrupts,
            pool,

            state: SolveState::Idle,
            decider: None,
            model: Vec::default(),
            conflict: Vec::default(),
        })
    }

    /// Applies `op` to every instance, each on its own thread, returning the results in order of instance.
    fn broadcast<R: Send>(&mut self, op: impl Fn(&mut E) -> R + Sync) -> Vec<R> {
        let op = &op;
        std::thread::scope(|scope| {
            let workers = self
                .engines
                .iter_mut()
                .map(|engine| scope.spawn(move || op(engine)))
                .collect::<Vec<_>>();

            workers
                .into_iter()
                .map(|worker| match worker.join() {
                    Ok(result) => result,
                    Err(e) => panic::resume_unwind(e),
                })
                .collect()
        })
    }

    /// A fresh atom in every instance, returning the shared id of the atom.
    ///
    /// # Panics
    /// If the instances disagree on the id.
    pub fn new_var(&mut self, decision: bool) -> Result<Atom, err::ErrorKind> {
        let mut ids = self.broadcast(|engine| engine.fresh_atom(decision)).into_iter();

        let first = match ids.next() {
            Some(id) => id,
            None => return Err(err::ErrorKind::InvalidState),
        };
        for (index, id) in ids.enumerate() {
            if id != first {
                panic!("! Instance {} gave {id:?} for a fresh atom, not {first:?}", index + 1);
            }
        }
        first
    }

    /// Adds `clause` to every instance, returning true only if no instance refused the clause.
    ///
    /// Instances which accepted the clause keep it, regardless.
    pub fn add(&mut self, clause: &Clause) -> bool {
        let accepted = self.broadcast(|engine| engine.add_clause(clause));
        let all = accepted.iter().all(|ok| *ok);
        if !all {
            log::info!(target: targets::PORTFOLIO, "Clause {} refused by some instance", clause.as_dimacs());
        }
        all
    }

    /// Adds an original clause to every instance.
    pub fn add_clause(&mut self, literals: Vec<CLiteral>) -> bool {
        self.add(&Clause::original(literals))
    }

    /// Adds a learnt clause to every instance.
    pub fn add_learnt_clause(&mut self, literals: Vec<CLiteral>, glue: Glue, activity: f32) -> bool {
        self.add(&Clause::learnt(literals, glue, activity))
    }

    /// Adds an xor clause to every instance.
    pub fn add_xor_clause(&mut self, literals: Vec<CLiteral>, parity: bool) -> bool {
        self.add(&Clause::xor(literals, parity))
    }

    pub fn solve(&mut self) -> Result<Report, err::ErrorKind> {
        self.solve_with_assumptions(&[])
    }

    /// Races the instances on the formula under `assumptions`, returning the verdict of the first to finish.
    pub fn solve_with_assumptions(
        &mut self,
        assumptions: &[CLiteral],
    ) -> Result<Report, err::ErrorKind> {
        for flag in &self.interrupts {
            flag.store(false, Ordering::SeqCst);
        }
        self.decider = None;
        self.model.clear();
        self.conflict.clear();
        self.state = SolveState::Running;

        let board = FinishBoard::new(self.engines.len());
        let interrupts = &self.interrupts;
        let board_ref = &board;

        let harvest = std::thread::scope(|scope| {
            let workers = self
                .engines
                .iter_mut()
                .enumerate()
                .map(|(index, engine)| {
                    scope.spawn(move || {
                        // A panicking instance still registers, so the decider is not left waiting.
                        let report = match panic::catch_unwind(AssertUnwindSafe(|| engine.solve(assumptions))) {
                            Ok(report) => report,
                            Err(e) => {
                                board_ref.finish(index, interrupts);
                                panic::resume_unwind(e)
                            }
                        };
                        log::debug!(target: targets::PORTFOLIO, "Instance {index} returned {report:?}");

                        match board_ref.finish(index, interrupts) {
                            false => None,
                            true => {
                                board_ref.wait_for_all();
                                Some(Harvest {
                                    report,
                                    model: engine.model().to_vec(),
                                    conflict: engine.conflict().to_vec(),
                                })
                            }
                        }
                    })
                })
                .collect::<Vec<_>>();

            let mut harvest = None;
            for worker in workers {
                match worker.join() {
                    Ok(Some(taken)) => harvest = Some(taken),
                    Ok(None) => {}
                    Err(e) => panic::resume_unwind(e),
                }
            }
            harvest
        });

        self.state = board.state();
        self.decider = board.decider();
        self.pool.reset();

        match harvest {
            Some(harvest) => {
                self.model = harvest.model;
                self.conflict = harvest.conflict;
                let report = harvest.report?;

                if let Some(decider) = self.decider {
                    log::info!(target: targets::PORTFOLIO, "Instance {decider} reports {report}");
                }
                Ok(report)
            }
            None => Err(err::ErrorKind::InvalidState),
        }
    }

    /// Asks every instance to stop, without waiting.
    pub fn set_need_to_interrupt(&self) {
        for engine in &self.engines {
            engine.set_need_to_interrupt();
        }
    }

    /// A handle which may interrupt every instance from another thread.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            flags: self.interrupts.clone(),
        }
    }

    fn decider_engine(&self) -> Result<&E, err::ErrorKind> {
        match self.decider {
            Some(index) => Ok(&self.engines[index]),
            None => Err(err::ErrorKind::InvalidState),
        }
    }

    /// Prints statistics of the decider of the last solve.
    pub fn print_stats(&self) -> Result<(), err::ErrorKind> {
        let peer_count = self.engines.len() - 1;
        self.decider_engine()?.print_stats(peer_count);
        Ok(())
    }

    /// Writes the learnt clauses of the decider of the last solve of at most `max_size` literals to `path`.
    pub fn dump_sorted_learnts(&self, path: &Path, max_size: usize) -> Result<(), err::ErrorKind> {
        self.decider_engine()?.dump_sorted_learnts(path, max_size)
    }

    /// Writes the formula held by the decider of the last solve to `path`.
    pub fn dump_original_clauses(
        &self,
        path: &Path,
        also_learnt_binaries: bool,
    ) -> Result<(), err::ErrorKind> {
        self.decider_engine()?
            .dump_original_clauses(path, also_learnt_binaries)
    }

    /// Names `atom` in every instance.
    pub fn set_variable_name(&mut self, atom: Atom, name: &str) {
        self.broadcast(|engine| engine.set_atom_name(atom, name));
    }

    /// The model found by the last solve, if satisfiable, indexed by atom.
    pub fn model(&self) -> &[Option<bool>] {
        &self.model
    }

    /// The value of `atom` on the model found by the last solve.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.model.get(atom as usize).copied().flatten()
    }

    /// The conflict found by the last solve, if unsatisfiable under assumptions.
    pub fn conflict(&self) -> &[CLiteral] {
        &self.conflict
    }

    /// The index of the instance which decided the last solve.
    pub fn decider(&self) -> Option<usize> {
        self.decider
    }

    pub fn width(&self) -> usize {
        self.engines.len()
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    /// The sync counters of each instance.
    pub fn sync_stats(&self) -> Vec<SyncStats> {
        self.engines.iter().map(|engine| engine.sync_stats()).collect()
    }

    pub fn pool(&self) -> &Arc<SharedClausePool> {
        &self.pool
    }

    /// The instances of the portfolio.
    pub fn engines(&self) -> &[E] {
        &self.engines
    }
}
