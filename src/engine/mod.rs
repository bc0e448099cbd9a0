/*!
The interface between a portfolio and the sequential engines it runs.

Anything implementing [Engine] may be raced in a [portfolio](crate::portfolio).
The library provides one engine, the [Solver](crate::solver::Solver).

# Numbering

Each atom passed to or returned from an engine is in the shared numbering (see [atom](crate::structures::atom)).
So, an engine which introduces auxiliary atoms for itself must keep them out of every value returned through this interface.

# Interrupts

Interrupts are cooperative.
Each engine holds an [AtomicBool], a handle to which is given by [interrupt_flag](Engine::interrupt_flag), and an engine which observes the flag set during a solve must return [Report::Unknown] promptly.
The flag is only ever set by others, and only cleared by the portfolio before a solve.

# Sync

An engine is built with a [ClauseSyncChannel], and is expected to hand itself to the channel from time to time while on the top level of a solve.
*/

use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    config::Config,
    reports::Report,
    structures::{atom::Atom, clause::Clause, literal::CLiteral},
    sync::{ClauseSyncChannel, SyncStats},
    types::err::{self},
};

/// A sequential search engine.
pub trait Engine: Send {
    /// A fresh engine, configured by `config` and exchanging through `channel`.
    fn from_config(config: Config, channel: ClauseSyncChannel) -> Self
    where
        Self: Sized;

    /// Determines the satisfiability of the formula, under the given assumptions.
    fn solve(&mut self, assumptions: &[CLiteral]) -> Result<Report, err::ErrorKind>;

    /// A fresh atom, which is a candidate for decisions if `decision` is true.
    fn fresh_atom(&mut self, decision: bool) -> Result<Atom, err::ErrorKind>;

    /// Adds `clause` to the formula, returning false if the formula is now unsatisfiable.
    fn add_clause(&mut self, clause: &Clause) -> bool;

    /// The interrupt flag of the engine.
    fn interrupt_flag(&self) -> Arc<AtomicBool>;

    /// True if the engine has been asked to stop.
    fn need_to_interrupt(&self) -> bool {
        self.interrupt_flag().load(Ordering::Relaxed)
    }

    /// Asks the engine to stop.
    fn set_need_to_interrupt(&self) {
        self.interrupt_flag().store(true, Ordering::Relaxed)
    }

    /// The model found by the last satisfiable solve, indexed by atom.
    ///
    /// Index zero is unused.
    fn model(&self) -> &[Option<bool>];

    /// After an unsatisfiable solve, the negation of the assumptions responsible, if any.
    fn conflict(&self) -> &[CLiteral];

    /// Prints statistics on solves made so far, noting the count of peers which shared with the engine.
    fn print_stats(&self, peer_count: usize);

    /// Writes each learnt clause of at most `max_size` literals to `path`, in order of size.
    fn dump_sorted_learnts(&self, path: &Path, max_size: usize) -> Result<(), err::ErrorKind>;

    /// Writes the clauses of the formula to `path`, with any learnt binary clauses if `also_learnt_binaries`.
    fn dump_original_clauses(
        &self,
        path: &Path,
        also_learnt_binaries: bool,
    ) -> Result<(), err::ErrorKind>;

    /// Names `atom`.
    fn set_atom_name(&mut self, atom: Atom, name: &str);

    /// Counts of facts exchanged by the channel of the engine.
    fn sync_stats(&self) -> SyncStats;
}
