/*!
Exchange of derived facts between the engines of a portfolio.

Each engine owns a [ClauseSyncChannel], and each channel of a portfolio is bound to the same [SharedClausePool].
From time to time (and always at decision level zero) an engine hands itself to its channel through [ClauseSyncChannel::sync_data], and the channel:
- Publishes each literal fixed on the top level of the trail since the last exchange, as a [SharedUnit](pool::SharedUnit).
- Publishes each binary clause the engine has learnt since the last exchange, as a [SharedBinary](pool::SharedBinary).
- Applies each unit and binary clause published by some peer since the last exchange, through the [SyncHost] methods of the engine.

Only facts which follow from the formula are published, as units on the top level and learnt clauses are consequences of the formula regardless of any assumptions made.

# Numbering

The pool speaks the shared numbering (see [atom](crate::structures::atom)).
An engine speaks its inner numbering, which may be permuted at any time the engine is on the top level, and may include auxiliary atoms.
A channel maps between the two, and refuses to publish anything which mentions an auxiliary atom.

The engine keeps the channel informed:
- Each atom allocated is passed to [new_var](ClauseSyncChannel::new_var), in the order of allocation.
- Each permutation of the inner numbering is passed to [update_vars](ClauseSyncChannel::update_vars).

# Hosts

A channel does not know the structure of the engine which owns it, only the [SyncHost] interface.
So, to exchange, an engine takes its channel out of itself and passes itself to the channel as a host.
*/

mod channel;
pub use channel::ClauseSyncChannel;

pub mod pool;
pub use pool::SharedClausePool;

use crate::structures::literal::CLiteral;

/// The result of asking a host to absorb a fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Absorption {
    /// The fact was new to the host.
    Fresh,

    /// The host already had the fact, or something stronger.
    Redundant,

    /// The fact conflicts with the top level of the host.
    Contradiction,
}

/// The view a channel has of the engine which owns it.
///
/// Each literal passed to or from a host is in the inner numbering of the host.
pub trait SyncHost {
    /// The trail of the host.
    fn trail(&self) -> &[CLiteral];

    /// The length of the prefix of the trail made on the top level.
    fn top_level_end(&self) -> usize;

    /// Fixes `literal` on the top level.
    fn absorb_unit(&mut self, literal: CLiteral) -> Absorption;

    /// Adds `literals` as a learnt clause.
    fn absorb_clause(&mut self, literals: &[CLiteral]) -> Absorption;

    /// Asks the host to stop the current solve.
    fn request_interrupt(&mut self);
}

/// Counts of facts sent and received by a channel, across every session of its pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Units this channel published which were new to the pool.
    ///
    /// Units published again to a fresh session are not counted again.
    pub sent_units: u64,

    /// Units published by a peer which were new to the engine of this channel.
    pub recv_units: u64,

    /// Binary clauses this channel published which were new to the pool.
    pub sent_binaries: u64,

    /// Binary clauses published by a peer which were new to the engine of this channel.
    pub recv_binaries: u64,

    /// Facts from a backend which were new to the engine of this channel.
    pub recv_external: u64,
}

impl SyncStats {
    /// The sum of the counts of each field.
    pub fn sum(stats: impl IntoIterator<Item = SyncStats>) -> SyncStats {
        stats.into_iter().fold(SyncStats::default(), |a, b| SyncStats {
            sent_units: a.sent_units + b.sent_units,
            recv_units: a.recv_units + b.recv_units,
            sent_binaries: a.sent_binaries + b.sent_binaries,
            recv_binaries: a.recv_binaries + b.recv_binaries,
            recv_external: a.recv_external + b.recv_external,
        })
    }

    /// True if something was received from a peer or backend.
    pub fn received_any(&self) -> bool {
        self.recv_units + self.recv_binaries + self.recv_external > 0
    }
}
