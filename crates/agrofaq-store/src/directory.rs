//! User directory with atomic workload ledger
//!
//! Personnel records live here. The workload counter is the ledger the
//! assignment selector balances on: +1 on every successful assignment,
//! -1 on the submission that closes it. Counters are atomics so concurrent
//! assignment calls observe updated load without a read-modify-write window.

use crate::error::StoreError;
use agrofaq_model::{Role, User, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;

/// Live personnel record
///
/// Identity fields are immutable; eligibility flags and counters are atomics
/// mutated in place. [`UserRecord::snapshot`] produces the serializable view.
#[derive(Debug)]
pub struct UserRecord {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Workflow role
    pub role: Role,
    active: AtomicBool,
    available: AtomicBool,
    workload: AtomicU32,
    incentive: AtomicI64,
    penalty: AtomicI64,
}

impl UserRecord {
    fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            role,
            active: AtomicBool::new(true),
            available: AtomicBool::new(true),
            workload: AtomicU32::new(0),
            incentive: AtomicI64::new(0),
            penalty: AtomicI64::new(0),
        }
    }

    /// Current open-assignment count
    #[inline]
    #[must_use]
    pub fn workload(&self) -> u32 {
        self.workload.load(Ordering::SeqCst)
    }

    /// Whether this user may receive assignments right now
    #[inline]
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.active.load(Ordering::SeqCst) && self.available.load(Ordering::SeqCst)
    }

    /// Point-in-time serializable snapshot
    #[must_use]
    pub fn snapshot(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
            is_active: self.active.load(Ordering::SeqCst),
            is_available: self.available.load(Ordering::SeqCst),
            workload_count: self.workload.load(Ordering::SeqCst),
            incentive_points: self.incentive.load(Ordering::SeqCst),
            penalty: self.penalty.load(Ordering::SeqCst),
        }
    }

    /// Atomically add one open assignment; returns the new count
    pub fn increment_workload(&self) -> u32 {
        self.workload.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Saturating decrement: the ledger never goes negative even if a
    /// close-out races a correction.
    pub fn decrement_workload(&self) -> u32 {
        let prev = self
            .workload
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |w| w.checked_sub(1))
            .unwrap_or(0);
        prev.saturating_sub(1)
    }
}

/// Directory of personnel records
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: DashMap<UserId, Arc<UserRecord>>,
}

impl UserDirectory {
    /// Create an empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user, active and available by default
    pub fn add_user(&self, name: impl Into<String>, role: Role) -> Arc<UserRecord> {
        let record = Arc::new(UserRecord::new(name, role));
        self.users.insert(record.id, Arc::clone(&record));
        record
    }

    /// Look up a record
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<Arc<UserRecord>> {
        self.users.get(&id).map(|r| Arc::clone(&r))
    }

    /// Look up a record, failing with `UserNotFound`
    pub fn require(&self, id: UserId) -> Result<Arc<UserRecord>, StoreError> {
        self.get(id).ok_or(StoreError::UserNotFound(id))
    }

    /// All eligible (active + available) users of a role
    #[must_use]
    pub fn candidates(&self, role: Role) -> Vec<Arc<UserRecord>> {
        self.users
            .iter()
            .filter(|r| r.role == role && r.is_eligible())
            .map(|r| Arc::clone(&r))
            .collect()
    }

    /// Atomically add one open assignment to the ledger
    pub fn increment_workload(&self, id: UserId) -> Result<u32, StoreError> {
        Ok(self.require(id)?.increment_workload())
    }

    /// Atomically close one open assignment; saturates at zero
    pub fn decrement_workload(&self, id: UserId) -> Result<u32, StoreError> {
        Ok(self.require(id)?.decrement_workload())
    }

    /// Award incentive points
    pub fn award_points(&self, id: UserId, points: i64) -> Result<(), StoreError> {
        self.require(id)?.incentive.fetch_add(points, Ordering::SeqCst);
        Ok(())
    }

    /// Apply a penalty
    pub fn apply_penalty(&self, id: UserId, penalty: i64) -> Result<(), StoreError> {
        self.require(id)?.penalty.fetch_add(penalty, Ordering::SeqCst);
        Ok(())
    }

    /// Toggle availability (leave, capacity management)
    pub fn set_available(&self, id: UserId, available: bool) -> Result<(), StoreError> {
        self.require(id)?.available.store(available, Ordering::SeqCst);
        Ok(())
    }

    /// Toggle account activation
    pub fn set_active(&self, id: UserId, active: bool) -> Result<(), StoreError> {
        self.require(id)?.active.store(active, Ordering::SeqCst);
        Ok(())
    }

    /// Number of registered users
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Snapshots of every user (reporting)
    #[must_use]
    pub fn snapshot_all(&self) -> Vec<User> {
        self.users.iter().map(|r| r.snapshot()).collect()
    }
}
