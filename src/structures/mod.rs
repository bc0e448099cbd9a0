//! Abstract elements of a solve and their representation.
//!
//! - [Atoms](atom), aka. variables.
//! - [Literals](literal), atoms paired with a polarity.
//! - [Clauses](clause), literals together with a kind and metadata.

pub mod atom;
pub mod clause;
pub mod literal;
