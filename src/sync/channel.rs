use std::sync::Arc;

use crate::{
    misc::log::targets::{self},
    reports::Report,
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    sync::{
        pool::{ChannelId, SharedBinary, SharedClausePool, UnitStatus},
        Absorption, SyncHost, SyncStats,
    },
    transport::{Exchange, SyncBackend},
};

/// The most entries copied out of the pool at once.
const READ_BATCH: usize = 1024;

/// The channel of an engine.
///
/// A default channel is bound to no pool and has no backend, and so exchanges nothing.
pub struct ClauseSyncChannel {
    pool: Option<Arc<SharedClausePool>>,
    id: ChannelId,

    /// The session of the pool at the last exchange.
    session: u64,

    /// The length of the top level of the trail at the last exchange.
    trail_copied_until: usize,

    /// The length of the top level of the trail whose units have been counted as sent, in any session.
    trail_counted_until: usize,

    /// Binary clauses learnt since the last exchange, in the inner numbering.
    new_binaries: Vec<(CLiteral, CLiteral)>,

    /// For each peer, the count of units of the stream of the peer already read.
    unit_cursors: Vec<usize>,

    /// For each peer, the count of binaries of the stream of the peer already read.
    binary_cursors: Vec<usize>,

    stats: SyncStats,

    outer_to_shared: Vec<Option<Atom>>,
    shared_to_outer: Vec<Atom>,
    outer_to_inner: Vec<Atom>,
    inner_to_outer: Vec<Atom>,

    // Composed from the above, and rebuilt only when needed.
    inner_to_shared: Vec<Option<Atom>>,
    shared_to_inner: Vec<Option<Atom>>,
    must_rebuild: bool,

    backend: Option<Box<dyn SyncBackend>>,
}

impl Default for ClauseSyncChannel {
    fn default() -> Self {
        ClauseSyncChannel {
            pool: None,
            id: 0,
            session: 0,
            trail_copied_until: 0,
            trail_counted_until: 0,
            new_binaries: Vec::default(),
            unit_cursors: Vec::default(),
            binary_cursors: Vec::default(),
            stats: SyncStats::default(),

            outer_to_shared: vec![None],
            shared_to_outer: vec![0],
            outer_to_inner: vec![0],
            inner_to_outer: vec![0],

            inner_to_shared: vec![None],
            shared_to_inner: vec![None],
            must_rebuild: false,

            backend: None,
        }
    }
}

impl ClauseSyncChannel {
    /// A channel registered with `pool`.
    pub fn new(pool: Arc<SharedClausePool>) -> Self {
        let id = pool.register();
        let session = pool.session();
        ClauseSyncChannel {
            id,
            session,
            pool: Some(pool),
            ..Default::default()
        }
    }

    /// The channel, composed with `backend`.
    pub fn with_backend(mut self, backend: Box<dyn SyncBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// True if the channel is bound to a pool.
    pub fn enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// True if the channel exchanges with anything at all.
    pub fn active(&self) -> bool {
        self.pool.is_some() || self.backend.is_some()
    }

    /// The id of the channel in its pool, if bound to a pool.
    pub fn id(&self) -> Option<ChannelId> {
        self.pool.as_ref().map(|_| self.id)
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Notes the engine has allocated an atom, returning the shared id of the atom, if it has one.
    ///
    /// The atom is taken to be next in both the outer and inner numbering of the engine.
    pub fn new_var(&mut self, auxiliary: bool) -> Option<Atom> {
        let outer = self.outer_to_shared.len() as Atom;
        let inner = self.inner_to_outer.len() as Atom;
        self.outer_to_inner.push(inner);
        self.inner_to_outer.push(outer);

        let caches_aligned = !self.must_rebuild
            && self.inner_to_shared.len() == inner as usize
            && self.shared_to_inner.len() == self.shared_to_outer.len();

        let shared = match auxiliary {
            true => {
                self.outer_to_shared.push(None);
                None
            }

            false => {
                let shared = self.shared_to_outer.len() as Atom;
                self.shared_to_outer.push(outer);
                self.outer_to_shared.push(Some(shared));
                Some(shared)
            }
        };

        match caches_aligned {
            true => {
                self.inner_to_shared.push(shared);
                if shared.is_some() {
                    self.shared_to_inner.push(Some(inner));
                }
            }
            false => self.must_rebuild = true,
        }

        shared
    }

    /// Notes the engine has allocated `n` (non-auxiliary) atoms.
    pub fn new_vars(&mut self, n: usize) {
        for _ in 0..n {
            self.new_var(false);
        }
    }

    /// Frees spare capacity, and drops the cached translation of any inner atom past `atom_count`.
    ///
    /// A dropped translation is rebuilt in full at the next exchange.
    /// As an engine never removes atoms, given the atom count of the engine this only frees spare capacity.
    pub fn save_on_var_memory(&mut self, atom_count: usize) {
        let live = atom_count + 1;
        if self.inner_to_shared.len() > live {
            self.inner_to_shared.truncate(live);
            self.must_rebuild = true;
        }

        self.inner_to_shared.shrink_to_fit();
        self.shared_to_inner.shrink_to_fit();
        self.outer_to_shared.shrink_to_fit();
        self.shared_to_outer.shrink_to_fit();
        self.outer_to_inner.shrink_to_fit();
        self.inner_to_outer.shrink_to_fit();
        self.new_binaries.shrink_to_fit();
    }

    /// Rebuilds the maps between the inner and shared numberings.
    pub fn rebuild_translation(&mut self) {
        self.inner_to_shared = self
            .inner_to_outer
            .iter()
            .map(|outer| self.outer_to_shared[*outer as usize])
            .collect();

        self.shared_to_inner = self
            .shared_to_outer
            .iter()
            .map(|outer| Some(self.outer_to_inner[*outer as usize]))
            .collect();
        self.shared_to_inner[0] = None;

        self.must_rebuild = false;
    }

    /// Rebuilds the maps between the inner and shared numberings, if some renumbering has happened since the last rebuild.
    pub fn rebuild_translation_if_needed(&mut self) {
        if self.must_rebuild {
            self.rebuild_translation();
        }
    }

    /// Notes the engine has permuted its inner numbering.
    ///
    /// Pending binary clauses are moved to the new numbering.
    /// Cursors index streams of the pool, and so are unaffected.
    ///
    /// # Panics
    /// If the given maps do not cover every atom allocated.
    pub fn update_vars(&mut self, outer_to_inner: &[Atom], inner_to_outer: &[Atom]) {
        if outer_to_inner.len() != self.outer_to_shared.len()
            || inner_to_outer.len() != self.outer_to_shared.len()
        {
            panic!(
                "! Renumbering of {} atoms given to a channel of {} atoms",
                outer_to_inner.len(),
                self.outer_to_shared.len()
            );
        }

        let remap = |literal: CLiteral| {
            let outer = self.inner_to_outer[literal.atom() as usize];
            literal.with_atom(outer_to_inner[outer as usize])
        };

        let pending = std::mem::take(&mut self.new_binaries);
        self.new_binaries = pending
            .into_iter()
            .map(|(a, b)| (remap(a), remap(b)))
            .collect();

        self.outer_to_inner = outer_to_inner.to_vec();
        self.inner_to_outer = inner_to_outer.to_vec();
        self.must_rebuild = true;
    }

    /// Notes the engine has learnt the binary clause `a ∨ b`.
    pub fn signal_new_bin_clause(&mut self, a: CLiteral, b: CLiteral) {
        if self.active() {
            self.new_binaries.push((a, b));
        }
    }

    /// Notes the engine has learnt a clause of more than two literals.
    ///
    /// Offered to the backend at once, if there is a backend and each atom of the clause has a shared id.
    pub fn signal_new_long_clause(&mut self, clause: &[CLiteral]) {
        if self.backend.is_none() {
            return;
        }
        self.rebuild_translation_if_needed();

        let shared = clause
            .iter()
            .map(|literal| self.to_shared(*literal))
            .collect::<Option<Vec<_>>>();

        if let (Some(shared), Some(backend)) = (shared, self.backend.as_mut()) {
            backend.offer_long_clause(&shared);
        }
    }

    /// Notes the engine has finished a solve.
    pub fn note_finished(&mut self, report: Report) {
        if let Some(backend) = self.backend.as_mut() {
            if report.is_definite() {
                backend.finished(report);
            }
        }
    }

    fn to_shared(&self, literal: CLiteral) -> Option<CLiteral> {
        self.inner_to_shared
            .get(literal.atom() as usize)
            .copied()
            .flatten()
            .map(|atom| literal.with_atom(atom))
    }

    fn to_inner(&self, literal: CLiteral) -> Option<CLiteral> {
        self.shared_to_inner
            .get(literal.atom() as usize)
            .copied()
            .flatten()
            .map(|atom| literal.with_atom(atom))
    }

    /// Exchanges facts with the pool and backend.
    ///
    /// Returns false if the top level of the host was found to conflict with some fact, in which case the formula is unsatisfiable.
    ///
    /// The host must be on the top level.
    pub fn sync_data(&mut self, host: &mut impl SyncHost) -> bool {
        if !self.active() {
            return true;
        }
        self.rebuild_translation_if_needed();

        if let Some(pool) = self.pool.as_ref() {
            let session = pool.session();
            if session != self.session {
                log::debug!(target: targets::SYNC, "Channel {} observed session {session}", self.id);
                self.session = session;
                self.trail_copied_until = 0;
                self.unit_cursors.iter_mut().for_each(|cursor| *cursor = 0);
                self.binary_cursors.iter_mut().for_each(|cursor| *cursor = 0);
            }
        }

        let (local, repeated) = self.collect_local(&*host);

        if let Some(pool) = self.pool.clone() {
            if !self.publish(&pool, &local, repeated) {
                return false;
            }
            if !self.consume(&pool, host) {
                return false;
            }
        }

        if let Some(mut backend) = self.backend.take() {
            let ok = self.exchange_with_backend(backend.as_mut(), &local, host);
            self.backend = Some(backend);
            if !ok {
                return false;
            }
        }

        log::trace!(target: targets::SYNC, "Channel {} stats: {:?}", self.id, self.stats);
        true
    }

    /// Units fixed and binaries learnt since the last exchange, in the shared numbering.
    ///
    /// Also returns a count of the leading units which were already sent in some earlier session.
    fn collect_local(&mut self, host: &impl SyncHost) -> (Exchange, usize) {
        let top_level_end = host.top_level_end();
        let mut local = Exchange::default();
        let mut repeated = 0;

        if self.trail_copied_until < top_level_end {
            for (index, literal) in host.trail()[..top_level_end]
                .iter()
                .enumerate()
                .skip(self.trail_copied_until)
            {
                if let Some(shared) = self.to_shared(*literal) {
                    local.units.push((shared.atom(), shared.polarity()));
                    if index < self.trail_counted_until {
                        repeated += 1;
                    }
                }
            }
        }
        self.trail_copied_until = top_level_end;
        self.trail_counted_until = self.trail_counted_until.max(top_level_end);

        for (a, b) in std::mem::take(&mut self.new_binaries) {
            if let (Some(a), Some(b)) = (self.to_shared(a), self.to_shared(b)) {
                local.binaries.push(SharedBinary::new(a, b));
            }
        }

        (local, repeated)
    }

    /// Publishes `local`, where the first `repeated` units are publications made again to a fresh session, and so are not counted.
    fn publish(&mut self, pool: &SharedClausePool, local: &Exchange, repeated: usize) -> bool {
        let (again, new) = local.units.split_at(repeated);

        for (units, counted) in [(again, false), (new, true)] {
            if units.is_empty() {
                continue;
            }
            match pool.publish_units(self.id, units) {
                UnitStatus::Published(fresh) => {
                    if counted {
                        self.stats.sent_units += fresh as u64;
                    }
                }
                UnitStatus::Contradiction(atom) => {
                    log::info!(target: targets::SYNC, "Channel {} holds the negation of a shared unit on {atom}", self.id);
                    return false;
                }
            }
        }

        if !local.binaries.is_empty() {
            let fresh = pool.publish_binaries(self.id, &local.binaries);
            self.stats.sent_binaries += fresh as u64;
        }

        true
    }

    fn consume(&mut self, pool: &SharedClausePool, host: &mut impl SyncHost) -> bool {
        let contributors = pool.contributors();
        if self.unit_cursors.len() < contributors {
            self.unit_cursors.resize(contributors, 0);
            self.binary_cursors.resize(contributors, 0);
        }

        for peer in (0..contributors).filter(|peer| *peer != self.id) {
            loop {
                let (units, binaries) = pool.read(
                    peer,
                    self.unit_cursors[peer],
                    self.binary_cursors[peer],
                    READ_BATCH,
                );

                if units.is_empty() && binaries.is_empty() {
                    break;
                }

                for unit in units {
                    self.unit_cursors[peer] += 1;
                    let Some(literal) = self.to_inner(unit.literal()) else {
                        log::trace!(target: targets::SYNC, "Unit on {} has no inner atom", unit.atom);
                        continue;
                    };

                    match host.absorb_unit(literal) {
                        Absorption::Fresh => self.stats.recv_units += 1,
                        Absorption::Redundant => {}
                        Absorption::Contradiction => {
                            log::info!(target: targets::SYNC, "Channel {} contradicted by a unit from {peer}", self.id);
                            return false;
                        }
                    }
                }

                for binary in binaries {
                    self.binary_cursors[peer] += 1;
                    let [a, b] = binary.literals();
                    let (Some(a), Some(b)) = (self.to_inner(a), self.to_inner(b)) else {
                        continue;
                    };

                    match host.absorb_clause(&[a, b]) {
                        Absorption::Fresh => self.stats.recv_binaries += 1,
                        Absorption::Redundant => {}
                        Absorption::Contradiction => {
                            log::info!(target: targets::SYNC, "Channel {} contradicted by a binary from {peer}", self.id);
                            return false;
                        }
                    }
                }
            }
        }

        true
    }

    fn exchange_with_backend(
        &mut self,
        backend: &mut dyn SyncBackend,
        local: &Exchange,
        host: &mut impl SyncHost,
    ) -> bool {
        if !local.is_empty() {
            if let Err(e) = backend.export(local) {
                log::warn!(target: targets::TRANSPORT, "Export from channel {} failed: {e:?}", self.id);
            }
        }

        let trail = host.trail()[..host.top_level_end()]
            .iter()
            .filter_map(|literal| self.to_shared(*literal))
            .collect::<Vec<_>>();
        backend.offer_trail(&trail);

        let imported = match backend.import() {
            Ok(imported) => imported,
            Err(e) => {
                log::warn!(target: targets::TRANSPORT, "Import to channel {} failed: {e:?}", self.id);
                Exchange::default()
            }
        };

        for (atom, value) in imported.units {
            let Some(literal) = self.to_inner(CLiteral::new(atom, value)) else {
                continue;
            };
            match host.absorb_unit(literal) {
                Absorption::Fresh => self.stats.recv_external += 1,
                Absorption::Redundant => {}
                Absorption::Contradiction => return false,
            }
        }

        let clauses = imported
            .binaries
            .iter()
            .map(|binary| binary.literals().to_vec())
            .chain(imported.clauses);

        for clause in clauses {
            let Some(literals) = clause
                .iter()
                .map(|literal| self.to_inner(*literal))
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            if literals.is_empty() {
                continue;
            }

            match host.absorb_clause(&literals) {
                Absorption::Fresh => self.stats.recv_external += 1,
                Absorption::Redundant => {}
                Absorption::Contradiction => return false,
            }
        }

        if backend.interrupt_requested() {
            log::info!(target: targets::TRANSPORT, "Channel {} interrupted through its backend", self.id);
            host.request_interrupt();
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand_core::{RngCore, SeedableRng};

    use super::*;
    use crate::generic::random::MinimalPCG32;

    #[derive(Default)]
    struct MockHost {
        trail: Vec<CLiteral>,
        values: HashMap<Atom, bool>,
        clauses: Vec<Vec<CLiteral>>,
        interrupted: bool,
    }

    impl MockHost {
        fn fix(&mut self, literal: CLiteral) {
            self.values.insert(literal.atom(), literal.polarity());
            self.trail.push(literal);
        }
    }

    impl SyncHost for MockHost {
        fn trail(&self) -> &[CLiteral] {
            &self.trail
        }

        fn top_level_end(&self) -> usize {
            self.trail.len()
        }

        fn absorb_unit(&mut self, literal: CLiteral) -> Absorption {
            match self.values.get(&literal.atom()) {
                Some(value) if *value == literal.polarity() => Absorption::Redundant,
                Some(_) => Absorption::Contradiction,
                None => {
                    self.fix(literal);
                    Absorption::Fresh
                }
            }
        }

        fn absorb_clause(&mut self, literals: &[CLiteral]) -> Absorption {
            let mut sorted = literals.to_vec();
            sorted.sort();
            match self.clauses.contains(&sorted) {
                true => Absorption::Redundant,
                false => {
                    self.clauses.push(sorted);
                    Absorption::Fresh
                }
            }
        }

        fn request_interrupt(&mut self) {
            self.interrupted = true;
        }
    }

    fn pair(pool: &Arc<SharedClausePool>, atoms: usize) -> (ClauseSyncChannel, ClauseSyncChannel) {
        let mut a = ClauseSyncChannel::new(pool.clone());
        let mut b = ClauseSyncChannel::new(pool.clone());
        a.new_vars(atoms);
        b.new_vars(atoms);
        (a, b)
    }

    #[test]
    fn disabled_channel_is_inert() {
        let mut channel = ClauseSyncChannel::default();
        channel.new_vars(2);
        channel.signal_new_bin_clause(CLiteral::from(1), CLiteral::from(2));

        let mut host = MockHost::default();
        host.fix(CLiteral::from(1));

        assert!(!channel.enabled());
        assert!(channel.sync_data(&mut host));
        assert_eq!(channel.stats(), SyncStats::default());
    }

    #[test]
    fn repeated_sync_is_idempotent() {
        let pool = Arc::new(SharedClausePool::default());
        let (mut a, mut b) = pair(&pool, 4);
        let mut host_a = MockHost::default();
        let mut host_b = MockHost::default();

        host_a.fix(CLiteral::from(1));
        a.signal_new_bin_clause(CLiteral::from(2), CLiteral::from(-3));
        host_b.fix(CLiteral::from(-4));

        assert!(a.sync_data(&mut host_a));
        assert!(b.sync_data(&mut host_b));
        assert!(a.sync_data(&mut host_a));

        assert_eq!(b.stats().recv_units, 1);
        assert_eq!(b.stats().recv_binaries, 1);
        assert_eq!(a.stats().recv_units, 1);

        let stats = (a.stats(), b.stats());
        let sizes = (host_a.trail.len(), host_b.clauses.len());

        for _ in 0..3 {
            assert!(a.sync_data(&mut host_a));
            assert!(b.sync_data(&mut host_b));
        }

        assert_eq!((a.stats(), b.stats()), stats);
        assert_eq!((host_a.trail.len(), host_b.clauses.len()), sizes);
    }

    #[test]
    fn auxiliary_atoms_stay_private() {
        let pool = Arc::new(SharedClausePool::default());
        let mut a = ClauseSyncChannel::new(pool.clone());

        assert_eq!(a.new_var(false), Some(1));
        assert_eq!(a.new_var(true), None);
        assert_eq!(a.new_var(false), Some(2));

        let mut host = MockHost::default();
        host.fix(CLiteral::from(1));
        host.fix(CLiteral::from(-2));
        host.fix(CLiteral::from(3));
        a.signal_new_bin_clause(CLiteral::from(2), CLiteral::from(3));
        a.signal_new_bin_clause(CLiteral::from(-1), CLiteral::from(3));

        assert!(a.sync_data(&mut host));

        let (units, binaries) = pool.snapshot();
        let mut unit_atoms = units.iter().map(|unit| unit.atom).collect::<Vec<_>>();
        unit_atoms.sort();
        assert_eq!(unit_atoms, vec![1, 2]);
        assert_eq!(
            binaries,
            vec![SharedBinary::new(CLiteral::from(-1), CLiteral::from(2))]
        );
    }

    #[test]
    fn renumbering_keeps_translation() {
        let pool = Arc::new(SharedClausePool::default());
        let (mut a, mut b) = pair(&pool, 3);
        let mut host_a = MockHost::default();
        let mut host_b = MockHost::default();

        a.signal_new_bin_clause(CLiteral::from(1), CLiteral::from(2));

        // Inner atoms 1 and 3 swap places.
        let outer_to_inner = vec![0, 3, 2, 1];
        let inner_to_outer = vec![0, 3, 2, 1];
        a.update_vars(&outer_to_inner, &inner_to_outer);

        // Inner atom 3 is now outer, and so shared, atom 1.
        host_a.fix(CLiteral::from(3));
        assert!(a.sync_data(&mut host_a));

        let (units, binaries) = pool.snapshot();
        assert_eq!(units.iter().map(|u| u.atom).collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            binaries,
            vec![SharedBinary::new(CLiteral::from(1), CLiteral::from(2))]
        );

        // A unit on shared atom 1 from a peer lands on inner atom 3.
        host_b.fix(CLiteral::from(-3));
        assert!(b.sync_data(&mut host_b));
        let mut host_c = MockHost::default();
        let mut c = ClauseSyncChannel::new(pool.clone());
        c.new_vars(3);
        c.update_vars(&outer_to_inner, &inner_to_outer);
        assert!(c.sync_data(&mut host_c));
        assert!(host_c.trail.contains(&CLiteral::from(3)));
        assert!(host_c.trail.contains(&CLiteral::from(-1)));

        let stats = c.stats();
        assert!(c.sync_data(&mut host_c));
        assert_eq!(c.stats(), stats);
    }

    #[test]
    fn contradiction_is_reported() {
        let pool = Arc::new(SharedClausePool::default());
        let (mut a, mut b) = pair(&pool, 1);
        let mut host_a = MockHost::default();
        let mut host_b = MockHost::default();

        host_a.fix(CLiteral::from(1));
        host_b.fix(CLiteral::from(-1));

        assert!(a.sync_data(&mut host_a));
        assert!(!b.sync_data(&mut host_b));
    }

    #[test]
    fn new_session_republishes() {
        let pool = Arc::new(SharedClausePool::default());
        let (mut a, _b) = pair(&pool, 2);
        let mut host = MockHost::default();
        host.fix(CLiteral::from(2));

        assert!(a.sync_data(&mut host));
        pool.reset();
        assert_eq!(pool.value_of(2), None);

        assert!(a.sync_data(&mut host));
        assert_eq!(pool.value_of(2), Some(true));
        assert_eq!(a.stats().sent_units, 1);

        pool.reset();
        host.fix(CLiteral::from(-1));
        assert!(a.sync_data(&mut host));
        assert_eq!(pool.value_of(1), Some(false));
        assert_eq!(pool.value_of(2), Some(true));
        assert_eq!(a.stats().sent_units, 2);
    }

    #[test]
    fn dropped_translation_is_rebuilt() {
        let pool = Arc::new(SharedClausePool::default());
        let (mut a, mut b) = pair(&pool, 3);
        let mut host_a = MockHost::default();
        let mut host_b = MockHost::default();

        a.save_on_var_memory(1);
        host_a.fix(CLiteral::from(3));
        assert!(a.sync_data(&mut host_a));

        assert!(b.sync_data(&mut host_b));
        assert_eq!(host_b.trail, vec![CLiteral::from(3)]);
    }

    #[test]
    fn random_renumberings_keep_translation() {
        let pool = Arc::new(SharedClausePool::default());
        let mut rng = MinimalPCG32::seed_from_u64(7);

        // Outer atom 5 is auxiliary, so outer atoms past 5 have shared id one less.
        let mut a = ClauseSyncChannel::new(pool.clone());
        let mut outer_to_shared: Vec<Option<Atom>> = vec![None];
        for outer in 1..=9 {
            outer_to_shared.push(a.new_var(outer == 5));
        }
        let mut b = ClauseSyncChannel::new(pool.clone());
        b.new_vars(8);

        let mut host_a = MockHost::default();
        let mut host_b = MockHost::default();

        for round in 0..8_u32 {
            let mut inner_to_outer: Vec<Atom> = (0..=9).collect();
            for i in (2..=9).rev() {
                let j = 1 + (rng.next_u32() as usize % i);
                inner_to_outer.swap(i, j);
            }
            let mut outer_to_inner: Vec<Atom> = vec![0; 10];
            for (inner, outer) in inner_to_outer.iter().enumerate() {
                outer_to_inner[*outer as usize] = inner as Atom;
            }
            a.update_vars(&outer_to_inner, &inner_to_outer);

            let inner_of_shared = |shared: Atom| {
                let outer = outer_to_shared
                    .iter()
                    .position(|id| *id == Some(shared))
                    .unwrap();
                outer_to_inner[outer]
            };

            let shared = round + 1;
            let next = shared % 8 + 1;
            let value = round % 2 == 0;
            host_a.fix(CLiteral::new(inner_of_shared(shared), value));
            a.signal_new_bin_clause(
                CLiteral::from(inner_of_shared(shared) as i32),
                CLiteral::from(inner_of_shared(next) as i32),
            );
            a.signal_new_bin_clause(
                CLiteral::from(outer_to_inner[5] as i32),
                CLiteral::from(inner_of_shared(next) as i32),
            );

            assert!(a.sync_data(&mut host_a));
            let stats = a.stats();
            assert!(a.sync_data(&mut host_a));
            assert_eq!(a.stats(), stats, "round {round}");

            assert!(b.sync_data(&mut host_b));
            assert!(host_b.trail.contains(&CLiteral::new(shared, value)), "round {round}");
            assert_eq!(b.stats().recv_units, shared as u64);

            let (units, binaries) = pool.snapshot();
            assert!(units.iter().all(|unit| unit.atom >= 1 && unit.atom <= 8));
            assert_eq!(binaries.len(), shared as usize, "round {round}");
            assert!(binaries.contains(&SharedBinary::new(
                CLiteral::from(shared as i32),
                CLiteral::from(next as i32)
            )));
        }
    }
}
