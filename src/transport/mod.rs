/*!
Backends which carry facts beyond the [pool](crate::sync::SharedClausePool) of a process.

A [channel](crate::sync::ClauseSyncChannel) may be composed with a [SyncBackend] at construction.
At each exchange with the pool the channel also [exports](SyncBackend::export) what it has published to the backend, and [imports](SyncBackend::import) whatever the backend has received, applying imported facts to its engine in the same way as facts from a peer in the pool.

Everything passed through a backend is in the shared numbering, so no auxiliary atom of an engine is ever exported.

Two backends are provided:
- A [group] of members, exchanging facts over channels, each member standing for some other process (or thread) of a larger solve.
- An [accelerator] link, through which some external search device may offer clauses and assignments, and receive long learnt clauses and snapshots of the trail.

A channel without a backend behaves exactly as a channel with a backend which never has anything to import.

Failures of a backend are never fatal: the channel logs the failure and carries on, and as facts are exported on each exchange a lost export only delays a fact.
*/

pub mod accelerator;
pub mod group;

use crate::{
    reports::Report,
    structures::{atom::Atom, literal::CLiteral},
    sync::pool::SharedBinary,
    types::err::TransportError,
};

/// A bundle of facts passed to or from a backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Exchange {
    /// Top-level facts, as atoms paired with values.
    pub units: Vec<(Atom, bool)>,

    /// Binary clauses.
    pub binaries: Vec<SharedBinary>,

    /// Clauses of any length, which must follow from the formula.
    pub clauses: Vec<Vec<CLiteral>>,
}

impl Exchange {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.binaries.is_empty() && self.clauses.is_empty()
    }

    /// Appends the contents of `other`.
    pub fn extend(&mut self, other: Exchange) {
        self.units.extend(other.units);
        self.binaries.extend(other.binaries);
        self.clauses.extend(other.clauses);
    }
}

/// Something which carries facts between a channel and the world beyond the process.
pub trait SyncBackend: Send {
    /// Sends facts published by the channel.
    fn export(&mut self, exchange: &Exchange) -> Result<(), TransportError>;

    /// Takes any facts received since the last import.
    fn import(&mut self) -> Result<Exchange, TransportError>;

    /// Offers a long clause learnt by the engine of the channel.
    fn offer_long_clause(&mut self, _clause: &[CLiteral]) {}

    /// Offers the top-level trail of the engine of the channel.
    fn offer_trail(&mut self, _trail: &[CLiteral]) {}

    /// Whether the backend has learnt the solve should stop.
    fn interrupt_requested(&mut self) -> bool {
        false
    }

    /// Notes the engine of the channel has finished with the given report.
    fn finished(&mut self, _report: Report) {}
}
