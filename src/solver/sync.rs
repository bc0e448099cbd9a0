//! The solver as a host of its channel.
//!
//! To exchange, the solver takes its channel out of itself, hands itself to the channel, and then puts the channel back.
//! While the channel is out, any learnt clause is absorbed without being signalled to a channel, as absorbed clauses came from elsewhere.

use std::sync::atomic::Ordering;

use crate::{
    misc::log::targets::{self},
    solver::Solver,
    structures::literal::CLiteral,
    sync::{Absorption, SyncHost},
};

impl Solver {
    /// Exchanges through the channel, returning false if the formula was found to be unsatisfiable.
    ///
    /// The solver must be on the top level.
    pub(super) fn sync(&mut self) -> bool {
        if !self.channel.active() {
            return true;
        }
        if self.decision_level() > 0 {
            panic!("! Sync above the top level");
        }

        let mut channel = std::mem::take(&mut self.channel);
        let ok = channel.sync_data(self);
        self.channel = channel;

        if !ok {
            log::info!(target: targets::SYNC, "Unsatisfiable through an exchange");
            self.ok = false;
        }
        ok
    }
}

impl SyncHost for Solver {
    fn trail(&self) -> &[CLiteral] {
        &self.trail
    }

    fn top_level_end(&self) -> usize {
        match self.trail_lim.first() {
            Some(end) => *end,
            None => self.trail.len(),
        }
    }

    fn absorb_unit(&mut self, literal: CLiteral) -> Absorption {
        self.absorb_top_unit(literal)
    }

    fn absorb_clause(&mut self, literals: &[CLiteral]) -> Absorption {
        self.absorb_top_clause(literals)
    }

    fn request_interrupt(&mut self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }
}
