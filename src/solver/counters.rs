use std::time::Duration;

use crate::generic::luby::Luby;

/// Counts for various things which count, roughly.
pub struct Counters {
    /// A count of every conflict seen.
    pub total_conflicts: usize,

    /// A count of conflicts seen since the last restart.
    ///
    /// As u32 rather than a usize for easier interaction with scheduling variables.
    pub fresh_conflicts: u32,

    /// A count of conflicts since the last exchange through the channel.
    pub conflicts_since_sync: u32,

    /// A count of all decisions made.
    pub total_decisions: usize,

    /// A count of all literals propagated.
    pub total_propagations: usize,

    pub restarts: usize,
    pub reductions: usize,
    pub simplifications: usize,
    pub solves: usize,

    /// The conflict count at which to next simplify.
    pub next_simplify: usize,

    /// The interval between the last two simplifications.
    pub simplify_interval: f64,

    /// The time taken during solves.
    pub time: Duration,

    /// The current element in the luby sequence.
    pub luby: Luby,
}

impl Default for Counters {
    fn default() -> Self {
        Counters {
            total_conflicts: 0,
            fresh_conflicts: 0,
            conflicts_since_sync: 0,

            total_decisions: 0,
            total_propagations: 0,

            restarts: 0,
            reductions: 0,
            simplifications: 0,
            solves: 0,

            next_simplify: 0,
            simplify_interval: 0.0,

            time: Duration::from_secs(0),

            luby: Luby::default(),
        }
    }
}
