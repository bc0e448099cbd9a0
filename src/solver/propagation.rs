/*!
Boolean constraint propagation, over two watched literals.

Each clause of two or more literals watches its first two literals, and the watch list of a literal holds each clause watching the literal.
When a literal becomes false each clause watching the literal is inspected:
- If some other literal of the clause is true, nothing is required.
- If some unwatched literal is not false, the clause watches that literal instead.
- Otherwise, the other watched literal is asserted, or the clause is in conflict.

A watcher carries a blocker, some literal of the clause, which if true means the clause need not be inspected at all.

Clauses removed by [reduction](crate::solver) are dropped from watch lists as they are met.
*/

use crate::{
    misc::log::targets::{self},
    solver::{literal_value, ClauseKey, Solver, Watcher},
    structures::literal::Literal,
};

impl Solver {
    /// Watches the first two literals of the clause at `key`.
    pub(super) fn watch(&mut self, key: ClauseKey) {
        let literals = &self.clauses[key].literals;
        let (a, b) = (literals[0], literals[1]);
        self.watches[a.index()].push(Watcher {
            clause: key,
            blocker: b,
        });
        self.watches[b.index()].push(Watcher {
            clause: key,
            blocker: a,
        });
    }

    /// Propagates every literal on the trail not yet propagated, returning a clause in conflict if found.
    pub(super) fn propagate(&mut self) -> Option<ClauseKey> {
        let mut conflict = None;

        while self.q_head < self.trail.len() && conflict.is_none() {
            let false_literal = self.trail[self.q_head].negate();
            self.q_head += 1;
            self.counters.total_propagations += 1;

            let mut watchers = std::mem::take(&mut self.watches[false_literal.index()]);
            let mut keep = 0;
            let mut index = 0;

            while index < watchers.len() {
                let watcher = watchers[index];
                index += 1;

                if literal_value(&self.atoms, watcher.blocker) == Some(true) {
                    watchers[keep] = watcher;
                    keep += 1;
                    continue;
                }

                let clause = &mut self.clauses[watcher.clause];
                if clause.removed {
                    continue;
                }
                let literals = &mut clause.literals;

                if literals[0] == false_literal {
                    literals.swap(0, 1);
                }
                let first = literals[0];

                if first != watcher.blocker && literal_value(&self.atoms, first) == Some(true) {
                    watchers[keep] = Watcher {
                        clause: watcher.clause,
                        blocker: first,
                    };
                    keep += 1;
                    continue;
                }

                let mut moved = false;
                for k in 2..literals.len() {
                    if literal_value(&self.atoms, literals[k]) != Some(false) {
                        literals.swap(1, k);
                        self.watches[literals[1].index()].push(Watcher {
                            clause: watcher.clause,
                            blocker: first,
                        });
                        moved = true;
                        break;
                    }
                }
                if moved {
                    continue;
                }

                watchers[keep] = Watcher {
                    clause: watcher.clause,
                    blocker: first,
                };
                keep += 1;

                match literal_value(&self.atoms, first) {
                    Some(false) => {
                        conflict = Some(watcher.clause);
                        while index < watchers.len() {
                            watchers[keep] = watchers[index];
                            keep += 1;
                            index += 1;
                        }
                    }

                    None => self.assign(first, Some(watcher.clause)),

                    Some(true) => {}
                }
            }

            watchers.truncate(keep);
            self.watches[false_literal.index()] = watchers;
        }

        if let Some(key) = conflict {
            log::trace!(target: targets::PROPAGATION, "Conflict on clause {key} at level {}", self.decision_level());
        }
        conflict
    }
}
