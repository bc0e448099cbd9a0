/*!
The shared pool --- a process-wide, append-only, store of published facts.

Each [channel](crate::sync::ClauseSyncChannel) registers with the pool as a contributor, and is given a stream of its own.
Facts published by a channel are appended to its stream, and read by every other channel from a cursor it keeps for each stream.
As streams are only ever appended to (until the session is [reset](SharedClausePool::reset)), a cursor which has been advanced past an entry will never see the entry again, and will never skip an entry.

Alongside the streams the pool keeps:
- The value of each atom fixed by some published unit, so a unit is appended at most once, and a contributor publishing the opposite value learns of the contradiction.
- The set of published binary clauses, so a binary clause is appended at most once, regardless of the order of its literals.

All access is through a single mutex.
Reads copy at most a bounded batch out of the pool, so no lock is held while a fact is applied to an engine.

```rust
# use raft_sat::sync::pool::{SharedClausePool, UnitStatus};
let pool = SharedClausePool::default();
let a = pool.register();
let b = pool.register();

assert_eq!(pool.publish_units(a, &[(1, true)]), UnitStatus::Published(1));
assert_eq!(pool.publish_units(b, &[(1, true)]), UnitStatus::Published(0));
assert_eq!(pool.publish_units(b, &[(1, false)]), UnitStatus::Contradiction(1));

let (units, _) = pool.read(a, 0, 0, usize::MAX);
assert_eq!(units.len(), 1);
```
*/

use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use crate::{
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

/// The identifier of a contributor to a pool.
pub type ChannelId = usize;

/// A top-level fact: `atom` has `value` on every model of the formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SharedUnit {
    pub atom: Atom,
    pub value: bool,
    pub origin: ChannelId,
}

impl SharedUnit {
    pub fn literal(&self) -> CLiteral {
        CLiteral::new(self.atom, self.value)
    }
}

/// A derived two-literal clause, with literals in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SharedBinary {
    first: CLiteral,
    second: CLiteral,
}

impl SharedBinary {
    /// A binary clause from a pair of literals, in either order.
    pub fn new(a: CLiteral, b: CLiteral) -> Self {
        match a <= b {
            true => SharedBinary {
                first: a,
                second: b,
            },
            false => SharedBinary {
                first: b,
                second: a,
            },
        }
    }

    pub fn literals(&self) -> [CLiteral; 2] {
        [self.first, self.second]
    }
}

/// The result of publishing a batch of units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    /// Every unit was consistent with the pool, and this many were fresh.
    Published(usize),

    /// The pool holds the opposite value of the given atom.
    Contradiction(Atom),
}

#[derive(Default)]
struct Stream {
    units: Vec<SharedUnit>,
    binaries: Vec<SharedBinary>,
}

#[derive(Default)]
struct PoolState {
    streams: Vec<Stream>,
    values: Vec<Option<bool>>,
    binaries: HashSet<SharedBinary>,
    session: u64,
}

/// The pool.
#[derive(Default)]
pub struct SharedClausePool {
    state: Mutex<PoolState>,
}

impl SharedClausePool {
    // A poisoned lock is recovered, as every mutation of the state leaves the state consistent.
    fn state(&self) -> MutexGuard<'_, PoolState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a fresh contributor, returning the id of its stream.
    pub fn register(&self) -> ChannelId {
        let mut state = self.state();
        state.streams.push(Stream::default());
        state.streams.len() - 1
    }

    /// A count of registered contributors.
    pub fn contributors(&self) -> usize {
        self.state().streams.len()
    }

    /// The current session, which changes on each [reset](SharedClausePool::reset).
    pub fn session(&self) -> u64 {
        self.state().session
    }

    /// Appends each (atom, value) pair not already known to the stream of `origin`.
    ///
    /// Units before a contradicting unit are published, units after are not.
    pub fn publish_units(&self, origin: ChannelId, units: &[(Atom, bool)]) -> UnitStatus {
        let mut state = self.state();
        let mut fresh = 0;

        for &(atom, value) in units {
            if state.values.len() <= atom as usize {
                state.values.resize(atom as usize + 1, None);
            }

            match state.values[atom as usize] {
                None => {
                    state.values[atom as usize] = Some(value);
                    state.streams[origin].units.push(SharedUnit {
                        atom,
                        value,
                        origin,
                    });
                    fresh += 1;
                }

                Some(known) if known == value => {}

                Some(_) => {
                    log::info!(target: targets::POOL, "Channel {origin} contradicts the pool on atom {atom}");
                    return UnitStatus::Contradiction(atom);
                }
            }
        }

        UnitStatus::Published(fresh)
    }

    /// Appends each binary clause not already published to the stream of `origin`, returning a count of those appended.
    pub fn publish_binaries(&self, origin: ChannelId, binaries: &[SharedBinary]) -> usize {
        let mut state = self.state();
        let mut fresh = 0;

        for binary in binaries {
            if state.binaries.insert(*binary) {
                state.streams[origin].binaries.push(*binary);
                fresh += 1;
            }
        }

        fresh
    }

    /// The units and binary clauses of the stream of `peer` from the given cursors, up to `limit` of each.
    pub fn read(
        &self,
        peer: ChannelId,
        unit_cursor: usize,
        binary_cursor: usize,
        limit: usize,
    ) -> (Vec<SharedUnit>, Vec<SharedBinary>) {
        let state = self.state();
        let Some(stream) = state.streams.get(peer) else {
            return (Vec::default(), Vec::default());
        };

        let units = stream
            .units
            .iter()
            .skip(unit_cursor)
            .take(limit)
            .copied()
            .collect();

        let binaries = stream
            .binaries
            .iter()
            .skip(binary_cursor)
            .take(limit)
            .copied()
            .collect();

        (units, binaries)
    }

    /// The lengths of the unit and binary parts of the stream of `peer`.
    pub fn stream_lengths(&self, peer: ChannelId) -> (usize, usize) {
        let state = self.state();
        match state.streams.get(peer) {
            Some(stream) => (stream.units.len(), stream.binaries.len()),
            None => (0, 0),
        }
    }

    /// The value given to `atom` by some published unit, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.state().values.get(atom as usize).copied().flatten()
    }

    /// Every unit and binary clause in the pool, in stream order.
    pub fn snapshot(&self) -> (Vec<SharedUnit>, Vec<SharedBinary>) {
        let state = self.state();
        let units = state
            .streams
            .iter()
            .flat_map(|stream| stream.units.iter().copied())
            .collect();
        let binaries = state
            .streams
            .iter()
            .flat_map(|stream| stream.binaries.iter().copied())
            .collect();
        (units, binaries)
    }

    /// Ends the current session, clearing every stream while keeping registrations.
    pub fn reset(&self) {
        let mut state = self.state();
        for stream in state.streams.iter_mut() {
            stream.units.clear();
            stream.binaries.clear();
        }
        state.values.clear();
        state.binaries.clear();
        state.session += 1;
        log::debug!(target: targets::POOL, "Session {} begins", state.session);
    }
}
