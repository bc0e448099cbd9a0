/*!
A compact conflict-driven clause-learning engine.

The [Solver] implements [Engine], and so may be raced in a [portfolio](crate::portfolio).

# Overview

The search is the familiar loop:

```none
        +-----------+   conflict    +---------+   +----------+
  +---->| propagate |-------------->| analyse |-->| backjump |--+
  |     +-----------+               +---------+   +----------+  |
  |           |                                                 |
  |           | fixed point                                     |
  |           ⌄                                                 |
  |     +-----------+                                           |
  +-----|  decide   |<------------------------------------------+
        +-----------+
              |
              +-----> satisfiable, if every atom has a value
```

With, between conflicts:
- Restarts, scheduled by the [luby](crate::generic::luby) sequence.
- Reduction of learnt clauses, by glue and then activity.
- Exchanges through the [channel](crate::sync::ClauseSyncChannel) of the solver, each on the top level.
- Simplification on the top level, which removes satisfied clauses and false literals, and renumbers atoms so those without a value come first.

# Numbering

Atoms are held in the inner numbering, and the solver maps the shared numbering of callers to and from the inner numbering at the edge of each method of [Engine].
Auxiliary atoms are introduced only when cutting a long [xor](crate::structures::clause::ClauseKind::Xor) clause, and never have a shared id.

# Example

```rust
# use raft_sat::config::Config;
# use raft_sat::engine::Engine;
# use raft_sat::reports::Report;
# use raft_sat::solver::Solver;
# use raft_sat::structures::clause::Clause;
# use raft_sat::structures::literal::CLiteral;
# use raft_sat::sync::ClauseSyncChannel;
let mut solver = Solver::from_config(Config::default(), ClauseSyncChannel::default());
let p = solver.fresh_atom(true).unwrap() as i32;
let q = solver.fresh_atom(true).unwrap() as i32;

assert!(solver.add_clause(&Clause::original(vec![CLiteral::from(-p), CLiteral::from(q)])));
assert!(solver.add_clause(&Clause::original(vec![CLiteral::from(p)])));

assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));
assert_eq!(solver.model()[q as usize], Some(true));

assert_eq!(solver.solve(&[CLiteral::from(-q)]), Ok(Report::Unsatisfiable));
assert_eq!(solver.conflict(), &[CLiteral::from(q)]);
```
*/

mod analysis;
mod backjump;
mod clauses;
mod counters;
mod decision;
mod output;
mod propagation;
mod reduction;
mod search;
mod simplify;
mod sync;

use std::{
    collections::HashSet,
    path::Path,
    sync::{atomic::AtomicBool, Arc},
};

use rand::Rng;
use rand_core::SeedableRng;

use crate::{
    config::{Config, PolarityMode},
    engine::Engine,
    generic::{activity_heap::ActivityHeap, random::MinimalPCG32},
    reports::Report,
    structures::{
        atom::{Atom, ATOM_MAX},
        clause::{Clause, Glue},
        literal::{CLiteral, Literal},
    },
    sync::{ClauseSyncChannel, SyncStats},
    types::err::{self},
};

pub use counters::Counters;

/// The index of a clause in the clause database of a solver.
pub(crate) type ClauseKey = usize;

/// Everything known about an atom, indexed by the inner numbering.
#[derive(Clone, Debug)]
struct AtomCell {
    value: Option<bool>,
    level: u32,
    reason: Option<ClauseKey>,

    /// The value the atom last had, used for phase saving.
    phase: bool,

    /// Whether the atom may be chosen for a decision.
    decision: bool,

    /// The outer id of the atom.
    outer: Atom,

    /// The shared id of the atom, if the atom is not auxiliary.
    external: Option<Atom>,

    name: Option<String>,
}

/// Metadata of a learnt clause.
#[derive(Clone, Copy, Debug)]
struct LearntInfo {
    glue: Glue,
    activity: f64,
}

/// A clause, as stored.
#[derive(Clone, Debug)]
struct StoredClause {
    literals: Vec<CLiteral>,
    learnt: Option<LearntInfo>,
    removed: bool,
}

/// An entry of a watch list.
#[derive(Clone, Copy, Debug)]
struct Watcher {
    clause: ClauseKey,

    /// Some other literal of the clause, which if true means the clause need not be inspected.
    blocker: CLiteral,
}

/// The solver.
pub struct Solver {
    config: Config,
    channel: ClauseSyncChannel,
    interrupt: Arc<AtomicBool>,
    rng: MinimalPCG32,

    /// False once the formula is known to be unsatisfiable without assumptions.
    ok: bool,

    atoms: Vec<AtomCell>,
    activity: Vec<f64>,
    heap: ActivityHeap,
    activity_increment: f64,

    external_to_outer: Vec<Atom>,
    outer_to_inner: Vec<Atom>,

    trail: Vec<CLiteral>,
    trail_lim: Vec<usize>,
    q_head: usize,

    clauses: Vec<StoredClause>,
    watches: Vec<Vec<Watcher>>,

    /// Each binary clause held, as a sorted pair.
    binaries: HashSet<(CLiteral, CLiteral)>,
    clause_increment: f64,

    /// The clauses given by callers, in the shared numbering.
    formula: Vec<Clause>,

    seen: Vec<bool>,

    model: Vec<Option<bool>>,
    conflict: Vec<CLiteral>,

    counters: Counters,
}

impl Solver {
    fn value_of(&self, literal: CLiteral) -> Option<bool> {
        literal_value(&self.atoms, literal)
    }

    fn level_of(&self, atom: Atom) -> u32 {
        self.atoms[atom as usize].level
    }

    fn decision_level(&self) -> u32 {
        self.trail_lim.len() as u32
    }

    /// The inner id of a shared atom.
    fn inner_of(&self, external: Atom) -> Result<Atom, err::ErrorKind> {
        match self.external_to_outer.get(external as usize) {
            Some(outer) if external != 0 => Ok(self.outer_to_inner[*outer as usize]),
            _ => Err(err::AtomDBError::Unknown(external).into()),
        }
    }

    fn to_inner(&self, literal: CLiteral) -> Result<CLiteral, err::ErrorKind> {
        Ok(literal.with_atom(self.inner_of(literal.atom())?))
    }

    /// The literal in the shared numbering, if the atom of the literal has a shared id.
    fn to_external(&self, literal: CLiteral) -> Option<CLiteral> {
        self.atoms[literal.atom() as usize]
            .external
            .map(|atom| literal.with_atom(atom))
    }

    /// Values `literal` at the current decision level, with the given reason.
    fn assign(&mut self, literal: CLiteral, reason: Option<ClauseKey>) {
        let level = self.decision_level();
        let cell = &mut self.atoms[literal.atom() as usize];
        cell.value = Some(literal.polarity());
        cell.level = level;
        cell.reason = reason;
        self.trail.push(literal);
    }

    /// A fresh atom, next in both the outer and inner numbering.
    fn new_atom(&mut self, decision: bool, auxiliary: bool) -> Result<Atom, err::ErrorKind> {
        if self.atoms.len() as u64 > ATOM_MAX as u64 {
            return Err(err::AtomDBError::AtomsExhausted.into());
        }

        let inner = self.atoms.len() as Atom;
        let outer = self.outer_to_inner.len() as Atom;

        let external = match auxiliary {
            true => None,
            false => {
                let external = self.external_to_outer.len() as Atom;
                self.external_to_outer.push(outer);
                Some(external)
            }
        };
        self.channel.new_var(auxiliary);

        let phase = match self.config.polarity_mode.value {
            PolarityMode::True => true,
            PolarityMode::False => false,
            PolarityMode::Saved | PolarityMode::Random => self.rng.random_bool(0.5),
        };

        self.atoms.push(AtomCell {
            value: None,
            level: 0,
            reason: None,
            phase,
            decision,
            outer,
            external,
            name: None,
        });
        self.activity.push(0.0);
        self.outer_to_inner.push(inner);
        self.seen.push(false);
        self.watches.push(Vec::default());
        self.watches.push(Vec::default());

        if decision {
            self.heap.insert(inner as usize, &self.activity);
        }

        Ok(inner)
    }

    /// A count of atoms with a shared id.
    pub fn external_atom_count(&self) -> usize {
        self.external_to_outer.len() - 1
    }

    /// A count of every atom, including auxiliary atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len() - 1
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// The name of a shared atom, if set.
    pub fn atom_name(&self, atom: Atom) -> Option<&str> {
        let inner = self.inner_of(atom).ok()?;
        self.atoms[inner as usize].name.as_deref()
    }
}

/// The value of `literal` on the valuation given by `atoms`.
fn literal_value(atoms: &[AtomCell], literal: CLiteral) -> Option<bool> {
    atoms[literal.atom() as usize]
        .value
        .map(|value| value == literal.polarity())
}

impl Engine for Solver {
    fn from_config(config: Config, channel: ClauseSyncChannel) -> Self {
        let rng = MinimalPCG32::seed_from_u64(config.seed.value);
        let mut counters = Counters::default();
        counters.next_simplify = config.simplify_burst.value as usize;

        let top = AtomCell {
            value: Some(true),
            level: 0,
            reason: None,
            phase: true,
            decision: false,
            outer: 0,
            external: None,
            name: None,
        };

        Solver {
            config,
            channel,
            interrupt: Arc::new(AtomicBool::new(false)),
            rng,
            ok: true,

            atoms: vec![top],
            activity: vec![0.0],
            heap: ActivityHeap::default(),
            activity_increment: 1.0,

            external_to_outer: vec![0],
            outer_to_inner: vec![0],

            trail: Vec::default(),
            trail_lim: Vec::default(),
            q_head: 0,

            clauses: Vec::default(),
            watches: vec![Vec::default(), Vec::default()],
            binaries: HashSet::default(),
            clause_increment: 1.0,

            formula: Vec::default(),
            seen: vec![false],

            model: Vec::default(),
            conflict: Vec::default(),

            counters,
        }
    }

    fn solve(&mut self, assumptions: &[CLiteral]) -> Result<Report, err::ErrorKind> {
        for literal in assumptions {
            self.to_inner(*literal)?;
        }

        let report = self.search(assumptions)?;
        self.channel.note_finished(report);
        Ok(report)
    }

    fn fresh_atom(&mut self, decision: bool) -> Result<Atom, err::ErrorKind> {
        if self.decision_level() > 0 {
            return Err(err::ClauseDBError::DecisionMade.into());
        }
        let inner = self.new_atom(decision, false)?;
        match self.atoms[inner as usize].external {
            Some(external) => Ok(external),
            None => Err(err::ErrorKind::InvalidState),
        }
    }

    fn add_clause(&mut self, clause: &Clause) -> bool {
        match self.add_external_clause(clause) {
            Ok(ok) => ok,
            Err(e) => {
                log::warn!("Clause {} refused: {e}", clause.as_dimacs());
                false
            }
        }
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

    fn print_stats(&self, peer_count: usize) {
        self.write_stats(peer_count);
    }

    fn dump_sorted_learnts(&self, path: &Path, max_size: usize) -> Result<(), err::ErrorKind> {
        self.write_sorted_learnts(path, max_size)
    }

    fn dump_original_clauses(
        &self,
        path: &Path,
        also_learnt_binaries: bool,
    ) -> Result<(), err::ErrorKind> {
        self.write_original_clauses(path, also_learnt_binaries)
    }

    fn set_atom_name(&mut self, atom: Atom, name: &str) {
        match self.inner_of(atom) {
            Ok(inner) => self.atoms[inner as usize].name = Some(name.to_string()),
            Err(e) => log::warn!("Name {name} not given: {e}"),
        }
    }

    fn sync_stats(&self) -> SyncStats {
        self.channel.stats()
    }
}
