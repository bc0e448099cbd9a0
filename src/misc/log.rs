/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].

For example, with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
- Logs from the race between instances can be filtered with `RUST_LOG=portfolio …`, or
- Counts of facts exchanged, without propagation detail, with `RUST_LOG=sync=info …`
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [portfolio](crate::portfolio)
    pub const PORTFOLIO: &str = "portfolio";

    /// Logs related to [channels](crate::sync::ClauseSyncChannel)
    pub const SYNC: &str = "sync";

    /// Logs related to the [shared pool](crate::sync::SharedClausePool)
    pub const POOL: &str = "pool";

    /// Logs related to [transports](crate::transport)
    pub const TRANSPORT: &str = "transport";

    /// Logs related to propagation
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to conflict analysis
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to clause deletion
    pub const REDUCTION: &str = "reduction";

    /// Logs related to simplification and renumbering
    pub const SIMPLIFY: &str = "simplify";

    /// Logs related to backjumping
    pub const BACKJUMP: &str = "backjump";
}
