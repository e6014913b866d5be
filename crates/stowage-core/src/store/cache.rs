// ── Cached resource collections ──
//
// One `ResourceCache` per resource module: an ordered list of decoded
// records plus the module's status flag, broadcast through a `watch`
// channel so consumers can observe transitions. Full-list fetches are
// tagged with a monotonic sequence token so a response that lost the
// race against a newer fetch is discarded instead of clobbering the
// fresher cache.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::status::ResourceStatus;
use crate::model::Identified;

/// Ordered record cache with upsert-by-identity reconciliation.
///
/// The upsert rule is remove-then-append: all entries sharing the
/// incoming record's id are dropped, then the record is appended. That
/// guarantees at most one entry per id with the most recently written
/// version winning, but it does not preserve display order -- consumers
/// that care must re-sort.
pub struct ResourceCache<T> {
    items: RwLock<Vec<T>>,
    status: watch::Sender<ResourceStatus>,
    /// Latest issued full-fetch token; responses carrying an older
    /// token are stale and get discarded.
    seq: AtomicU64,
}

impl<T: Clone> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ResourceCache<T> {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ResourceStatus::Idle);
        Self {
            items: RwLock::new(Vec::new()),
            status,
            seq: AtomicU64::new(0),
        }
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn status(&self) -> ResourceStatus {
        *self.status.borrow()
    }

    /// Subscribe to status transitions via a `watch::Receiver`.
    pub fn subscribe_status(&self) -> watch::Receiver<ResourceStatus> {
        self.status.subscribe()
    }

    /// Mark an operation as started.
    pub(crate) fn start(&self) {
        self.status.send_replace(ResourceStatus::Loading);
    }

    pub(crate) fn succeed(&self) {
        self.status.send_replace(ResourceStatus::Success);
    }

    pub(crate) fn fail(&self) {
        self.status.send_replace(ResourceStatus::Failed);
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Snapshot of the cached list, in cache order.
    pub fn items(&self) -> Vec<T> {
        self.items.read().expect("cache lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().expect("cache lock poisoned").is_empty()
    }

    /// First cached entry matching the predicate.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.items
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|item| predicate(item))
            .cloned()
    }

    // ── Full-fetch sequencing ────────────────────────────────────────

    /// Start a full-list fetch: transition to `Loading` and issue the
    /// sequence token identifying this call.
    pub(crate) fn begin_fetch(&self) -> u64 {
        self.start();
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a full-list response if `token` is still the latest issued.
    /// Returns `false` for a stale response, which is discarded without
    /// touching the cache or the status flag (the newer in-flight call
    /// owns both).
    pub(crate) fn finish_fetch(&self, token: u64, items: Vec<T>) -> bool {
        if !self.is_latest(token) {
            return false;
        }
        *self.items.write().expect("cache lock poisoned") = items;
        self.succeed();
        true
    }

    /// Record a failed full-list fetch: cache untouched, status `Failed`
    /// unless a newer call has since been issued.
    pub(crate) fn fail_fetch(&self, token: u64) {
        if self.is_latest(token) {
            self.fail();
        }
    }

    pub(crate) fn is_latest(&self, token: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == token
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Drop all cached entries and return to `Idle` (per-user reset on
    /// login/logout).
    pub(crate) fn reset(&self) {
        self.items.write().expect("cache lock poisoned").clear();
        self.status.send_replace(ResourceStatus::Idle);
    }
}

impl<T: Clone + Identified> ResourceCache<T> {
    /// Insert-or-replace by identity: every entry whose id matches the
    /// incoming record is removed, then the record is appended last.
    pub(crate) fn upsert(&self, record: T) {
        let mut items = self.items.write().expect("cache lock poisoned");
        items.retain(|existing| existing.id() != record.id());
        items.push(record);
    }

    /// Remove the entry matching the given id, if present.
    pub(crate) fn remove(&self, id: &str) {
        self.items
            .write()
            .expect("cache lock poisoned")
            .retain(|existing| existing.id() != id);
    }

    /// Cached entry with the given id.
    pub fn get(&self, id: &str) -> Option<T> {
        self.find(|item| item.id() == id)
    }
}

/// Cache variant for modules that hold a single record (search results,
/// directory status) instead of a list.
pub struct SingleCache<T> {
    current: RwLock<Option<T>>,
    status: watch::Sender<ResourceStatus>,
    seq: AtomicU64,
}

impl<T: Clone> Default for SingleCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SingleCache<T> {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ResourceStatus::Idle);
        Self {
            current: RwLock::new(None),
            status,
            seq: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> ResourceStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ResourceStatus> {
        self.status.subscribe()
    }

    pub fn current(&self) -> Option<T> {
        self.current.read().expect("cache lock poisoned").clone()
    }

    pub(crate) fn begin_fetch(&self) -> u64 {
        self.status.send_replace(ResourceStatus::Loading);
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn finish_fetch(&self, token: u64, record: T) -> bool {
        if self.seq.load(Ordering::SeqCst) != token {
            return false;
        }
        *self.current.write().expect("cache lock poisoned") = Some(record);
        self.status.send_replace(ResourceStatus::Success);
        true
    }

    pub(crate) fn fail_fetch(&self, token: u64) {
        if self.seq.load(Ordering::SeqCst) == token {
            self.status.send_replace(ResourceStatus::Failed);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: String,
        name: String,
    }

    impl Identified for Rec {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn rec(id: &str, name: &str) -> Rec {
        Rec {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn upsert_keeps_at_most_one_entry_per_id() {
        let cache = ResourceCache::new();
        cache.upsert(rec("1", "esel"));
        cache.upsert(rec("2", "schaf"));
        cache.upsert(rec("1", "oink"));

        let items = cache.items();
        assert_eq!(items.len(), 2);
        // The replaced entry moves to the end -- remove-then-append.
        assert_eq!(items[0], rec("2", "schaf"));
        assert_eq!(items[1], rec("1", "oink"));
    }

    #[test]
    fn remove_drops_only_matching_id() {
        let cache = ResourceCache::new();
        cache.upsert(rec("1", "esel"));
        cache.upsert(rec("2", "schaf"));
        cache.remove("1");

        assert_eq!(cache.items(), vec![rec("2", "schaf")]);
        assert!(cache.get("1").is_none());
    }

    #[test]
    fn status_starts_idle_and_tracks_fetch_lifecycle() {
        let cache: ResourceCache<Rec> = ResourceCache::new();
        assert_eq!(cache.status(), ResourceStatus::Idle);

        let token = cache.begin_fetch();
        assert_eq!(cache.status(), ResourceStatus::Loading);

        assert!(cache.finish_fetch(token, vec![rec("1", "esel")]));
        assert_eq!(cache.status(), ResourceStatus::Success);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_fetch_response_is_discarded() {
        let cache: ResourceCache<Rec> = ResourceCache::new();
        let first = cache.begin_fetch();
        let second = cache.begin_fetch();

        assert!(cache.finish_fetch(second, vec![rec("2", "schaf")]));
        // The slower first call settles afterwards -- ignored.
        assert!(!cache.finish_fetch(first, vec![rec("1", "esel")]));
        assert_eq!(cache.items(), vec![rec("2", "schaf")]);
        assert_eq!(cache.status(), ResourceStatus::Success);

        // Same for a stale failure: status stays Success.
        cache.fail_fetch(first);
        assert_eq!(cache.status(), ResourceStatus::Success);
    }

    #[test]
    fn failed_fetch_leaves_cache_untouched() {
        let cache = ResourceCache::new();
        let token = cache.begin_fetch();
        cache.finish_fetch(token, vec![rec("1", "esel")]);

        let token = cache.begin_fetch();
        cache.fail_fetch(token);
        assert_eq!(cache.status(), ResourceStatus::Failed);
        assert_eq!(cache.items(), vec![rec("1", "esel")]);
    }

    #[test]
    fn reset_returns_to_idle() {
        let cache = ResourceCache::new();
        let token = cache.begin_fetch();
        cache.finish_fetch(token, vec![rec("1", "esel")]);

        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.status(), ResourceStatus::Idle);
    }
}
