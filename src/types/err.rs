//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - Some are external --- e.g. a configuration option set outside of its range, or a dump which could not be written.
//! - Some are absorbed where they arise --- e.g. a transport which has lost a peer is logged and ignored, as facts are offered again on the next exchange.
//!
//! Violations of invariants which should never occur under correct use (e.g. instances of a portfolio disagreeing on the id of a fresh atom) are not errors, and panic.
//
// Names of the error enums overlap with corresponding structs, and so throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::structures::atom::Atom;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    AtomDB(AtomDBError),
    ClauseDB(ClauseDBError),
    Config(ConfigError),
    Transport(TransportError),

    /// Some file could not be written.
    Io(std::io::ErrorKind),

    /// A method was called in a state which does not support it.
    InvalidState,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtomDB(e) => write!(f, "atom database: {e:?}"),
            Self::ClauseDB(e) => write!(f, "clause database: {e:?}"),
            Self::Config(e) => write!(f, "configuration: {e:?}"),
            Self::Transport(e) => write!(f, "transport: {e:?}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::InvalidState => write!(f, "invalid state"),
        }
    }
}

impl std::error::Error for ErrorKind {}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::Io(e.kind())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AtomDBError {
    /// There are no more fresh atoms.
    AtomsExhausted,

    /// Some atom was used before it was allocated.
    Unknown(Atom),
}

impl From<AtomDBError> for ErrorKind {
    fn from(e: AtomDBError) -> Self {
        ErrorKind::AtomDB(e)
    }
}

/// Errors in the clause database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDBError {
    /// Some attempt was made to store an empty clause.
    EmptyClause,

    /// All possible keys have been used.
    StorageExhausted,

    /// A clause was added after some decision had been made.
    DecisionMade,
}

impl From<ClauseDBError> for ErrorKind {
    fn from(e: ClauseDBError) -> Self {
        ErrorKind::ClauseDB(e)
    }
}

/// Errors in configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A portfolio requires at least one instance.
    Width,

    /// An option was set outside of its range.
    OutOfRange(&'static str),
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Errors from a transport.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportError {
    /// The other end of the transport has gone away.
    Disconnected,

    /// The transport was full, and something was dropped.
    Full,
}

impl From<TransportError> for ErrorKind {
    fn from(e: TransportError) -> Self {
        ErrorKind::Transport(e)
    }
}
