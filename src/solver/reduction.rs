//! Reduction of the learnt clauses.
//!
//! Learnt clauses of more than two literals are ranked by glue, and then by activity, and the worse half is removed.
//! Clauses with a glue of at most two are kept regardless, as are clauses which are the reason for some literal on the trail.
//!
//! Removal only marks a clause.
//! Watchers of a removed clause are dropped during propagation, and removed clauses are collected during [simplification](crate::solver).

use crate::{
    misc::log::targets::{self},
    solver::{ClauseKey, Solver},
    structures::literal::Literal,
};

impl Solver {
    fn is_reason(&self, key: ClauseKey) -> bool {
        let first = self.clauses[key].literals[0];
        let cell = &self.atoms[first.atom() as usize];
        cell.value.is_some() && cell.reason == Some(key)
    }

    pub(super) fn reduce(&mut self) {
        let mut candidates = self
            .clauses
            .iter()
            .enumerate()
            .filter_map(|(key, clause)| match (clause.removed, clause.learnt) {
                (false, Some(info)) if clause.literals.len() > 2 && info.glue > 2 => {
                    Some((key, info.glue, info.activity))
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        candidates.sort_by(|a, b| a.1.cmp(&b.1).then(b.2.total_cmp(&a.2)));

        let mut removed = 0;
        for (key, _, _) in candidates.iter().skip(candidates.len() / 2) {
            if self.is_reason(*key) {
                continue;
            }
            self.clauses[*key].removed = true;
            removed += 1;
        }

        self.counters.reductions += 1;
        log::debug!(target: targets::REDUCTION, "Reduction {} removed {removed} of {} candidates", self.counters.reductions, candidates.len());
    }
}
