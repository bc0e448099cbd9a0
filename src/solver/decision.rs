/*!
Methods for choosing the value of an atom.

The atom chosen is the most active atom without a value, taken from the activity heap.
As atoms are only removed from the heap when taken, atoms valued by propagation are skipped as they are met.

The value chosen is given by the [polarity mode](crate::config::PolarityMode):
- Saved, the value the atom last had (initialised at random, from the seed of the solver).
- False or True, always.
- Random, from the rng of the solver.
*/

use rand::Rng;

use crate::{
    config::PolarityMode,
    solver::Solver,
    structures::literal::{CLiteral, Literal},
};

impl Solver {
    /// A decision, or None if every decision atom has a value.
    pub(super) fn make_decision(&mut self) -> Option<CLiteral> {
        let atom = loop {
            let atom = self.heap.pop_max(&self.activity)?;
            if self.atoms[atom].value.is_none() {
                break atom;
            }
        };

        let value = match self.config.polarity_mode.value {
            PolarityMode::Saved => self.atoms[atom].phase,
            PolarityMode::False => false,
            PolarityMode::True => true,
            PolarityMode::Random => self.rng.random_bool(0.5),
        };

        self.counters.total_decisions += 1;
        Some(CLiteral::new(atom as u32, value))
    }

    /// Opens a fresh decision level.
    pub(super) fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }
}
