/*!
Configuration of an engine, and of the instances of a portfolio.

All configuration for an engine is contained within a [Config].
A portfolio is built from a single base configuration, from which a configuration for each instance is [derived](crate::portfolio::diversify).

Each option is a [ConfigOption], which pairs the value of the option with its name and range.
Options may be set directly, or through [ConfigOption::set], which refuses values outside the range of the option.

```rust
# use raft_sat::config::{Config, PolarityMode};
let mut config = Config::default();
assert!(config.sync_every.set(64).is_ok());
assert!(config.activity_decay.set(1.5).is_err());
config.polarity_mode.value = PolarityMode::True;
```
*/

mod config_option;
pub use config_option::ConfigOption;

mod polarity;
pub use polarity::PolarityMode;

use std::time::Duration;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// How to value an atom chosen for a decision.
    pub polarity_mode: ConfigOption<PolarityMode>,

    /// Simplify the formula before the first search of an engine.
    pub pre_simplify: ConfigOption<bool>,

    /// Conflicts before the first simplification during search.
    pub simplify_burst: ConfigOption<u32>,

    /// Conflicts between the first and second simplification during search.
    pub simplify_start: ConfigOption<f64>,

    /// The factor by which the interval between simplifications grows after each simplification.
    pub simplify_start_growth: ConfigOption<f64>,

    /// The `u` value to multiply the luby sequence by when determining whether to perform a restart.
    pub luby_u: ConfigOption<u32>,

    /// Permit (scheduled) restarts.
    pub restart: ConfigOption<bool>,

    /// Conflicts between reductions of the learnt clauses.
    pub reduction_interval: ConfigOption<u32>,

    /// The decay applied to atom activity after each conflict.
    pub activity_decay: ConfigOption<f64>,

    /// Conflicts between exchanges with the shared pool.
    pub sync_every: ConfigOption<u32>,

    /// Exchange derived facts with other instances, if any.
    pub sharing: ConfigOption<bool>,

    /// Xor clauses longer than this are cut into a chain through auxiliary atoms.
    pub xor_cut: ConfigOption<usize>,

    /// The time limit for a solve, with zero for no limit.
    pub time_limit: ConfigOption<Duration>,

    /// The seed for any source of randomness.
    pub seed: ConfigOption<u64>,

    /// How much to say about a solve.
    pub verbosity: ConfigOption<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            polarity_mode: ConfigOption {
                name: "polarity_mode",
                min: PolarityMode::MIN,
                max: PolarityMode::MAX,
                value: PolarityMode::Saved,
            },

            pre_simplify: ConfigOption {
                name: "pre_simplify",
                min: false,
                max: true,
                value: true,
            },

            simplify_burst: ConfigOption {
                name: "simplify_burst",
                min: 1,
                max: u32::MAX,
                value: 100,
            },

            simplify_start: ConfigOption {
                name: "simplify_start",
                min: 1.0,
                max: f64::MAX,
                value: 30_000.0,
            },

            simplify_start_growth: ConfigOption {
                name: "simplify_start_growth",
                min: 1.0,
                max: f64::MAX,
                value: 1.1,
            },

            luby_u: ConfigOption {
                name: "luby",
                min: 1,
                max: u32::MAX,
                value: 128,
            },

            restart: ConfigOption {
                name: "restart",
                min: false,
                max: true,
                value: true,
            },

            reduction_interval: ConfigOption {
                name: "reduction_interval",
                min: 1,
                max: u32::MAX,
                value: 2_000,
            },

            activity_decay: ConfigOption {
                name: "activity_decay",
                min: f64::MIN_POSITIVE,
                max: 1.0,
                value: 0.95,
            },

            sync_every: ConfigOption {
                name: "sync_every",
                min: 1,
                max: u32::MAX,
                value: 4_000,
            },

            sharing: ConfigOption {
                name: "sharing",
                min: false,
                max: true,
                value: true,
            },

            xor_cut: ConfigOption {
                name: "xor_cut",
                min: 3,
                max: 12,
                value: 4,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: Duration::from_secs(0),
                max: Duration::MAX,
                value: Duration::from_secs(0),
            },

            seed: ConfigOption {
                name: "seed",
                min: u64::MIN,
                max: u64::MAX,
                value: 0,
            },

            verbosity: ConfigOption {
                name: "verbosity",
                min: 0,
                max: 2,
                value: 1,
            },
        }
    }
}

impl Config {
    /// The time limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        match self.time_limit.value.is_zero() {
            true => None,
            false => Some(self.time_limit.value),
        }
    }
}
