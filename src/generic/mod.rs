//! Generic structures, not tied to any particular part of the library.

pub mod activity_heap;
pub mod luby;
pub mod random;
