/*!
Configurations for the instances of a portfolio.

Instances are diversified by when they simplify, and (for the last instance) by how they choose a polarity.
The first instance keeps the base configuration, and is the only instance which may speak.

Derivation is a pure function of the width of the portfolio and the base configuration.

```rust
# use raft_sat::config::{Config, PolarityMode};
# use raft_sat::portfolio::diversify::diversify;
let base = Config::default();
let configs = diversify(3, &base);

assert_eq!(configs[1].simplify_burst.value, base.simplify_burst.value * 2);
assert_eq!(configs[2].polarity_mode.value, PolarityMode::False);
assert!(!configs[2].pre_simplify.value);
assert_eq!(configs[2].seed.value, 2);
```
*/

use crate::config::{Config, PolarityMode};

/// The configuration of instance `index` of a portfolio of the given width.
pub fn diversify_instance(width: usize, index: usize, base: &Config) -> Config {
    let mut config = base.clone();
    config.seed.value = index as u64;

    if index == 0 {
        return config;
    }

    let factor = (1 + index) as u32;
    config.simplify_burst.value = base.simplify_burst.value.saturating_mul(factor);

    let scale = 1.0 + 0.2 * index as f64;
    config.simplify_start.value = base.simplify_start.value * scale;
    config.simplify_start_growth.value = base.simplify_start_growth.value * scale;

    config.verbosity.value = 0;

    if index == width - 1 {
        config.pre_simplify.value = false;
        config.polarity_mode.value = PolarityMode::False;
    }

    config
}

/// The configuration of each instance of a portfolio of the given width.
pub fn diversify(width: usize, base: &Config) -> Vec<Config> {
    (0..width)
        .map(|index| diversify_instance(width, index, base))
        .collect()
}
