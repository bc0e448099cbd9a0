//! Recovery from a conflict.
//!
//! A backjump is a 'jump' from some (higher) decision level to some previous (lower) decision level.
//! All decisions and all consequences of those decisions above the target level are undone, and each atom so freed returns to the activity heap.
//!
//! Passing a target level greater than the current level is safe --- nothing will happen.

use crate::{
    misc::log::targets::{self},
    solver::Solver,
    structures::literal::Literal,
};

impl Solver {
    /// Backjumps to the given target level.
    pub(super) fn backjump(&mut self, target: u32) {
        if self.decision_level() <= target {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backjump from {} to {target}", self.decision_level());

        let keep = self.trail_lim[target as usize];
        for literal in self.trail.drain(keep..) {
            let atom = literal.atom() as usize;
            let cell = &mut self.atoms[atom];
            cell.value = None;
            cell.reason = None;
            cell.phase = literal.polarity();
            if cell.decision {
                self.heap.insert(atom, &self.activity);
            }
        }

        self.trail_lim.truncate(target as usize);
        self.q_head = self.q_head.min(keep);
    }
}
