//! Per-user task notification records
//!
//! The notification arena is the source of truth for "my tasks"; delivery to
//! a live client is a best-effort side channel behind [`LivePush`]. Read
//! state changes independently of the underlying workflow, so consumers must
//! re-check entity state before presenting a task as actionable.

use agrofaq_model::{Notification, NotificationId, NotificationKind, RelatedEntity, UserId};
use chrono::Utc;
use dashmap::DashMap;

/// Dispatch-level failure
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Referenced notification does not exist
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),
}

/// Best-effort live delivery side channel (socket, push)
///
/// Implementations live in the external transport layer. Failures are logged
/// and swallowed by the dispatcher; the persisted record is authoritative.
pub trait LivePush: Send + Sync {
    /// Attempt to deliver a notification to a connected client
    fn push(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// No-op transport used when no live channel is wired up
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPush;

impl LivePush for NullPush {
    fn push(&self, _notification: &Notification) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Arena of per-user notification records
#[derive(Debug, Default)]
pub struct NotificationStore {
    notifications: DashMap<NotificationId, Notification>,
    by_user: DashMap<UserId, Vec<NotificationId>>,
}

impl NotificationStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notification record (at-most-once delivery record)
    pub fn notify(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        related: RelatedEntity,
    ) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            related,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.insert(notification.id, notification.clone());
        self.by_user.entry(user_id).or_default().push(notification.id);
        tracing::debug!(user = %user_id, kind = ?kind, "notification recorded");
        notification
    }

    /// Fetch a notification
    pub fn get(&self, id: NotificationId) -> Result<Notification, DispatchError> {
        self.notifications
            .get(&id)
            .map(|n| n.clone())
            .ok_or(DispatchError::NotificationNotFound(id))
    }

    /// Mark one notification read; idempotent
    ///
    /// Returns whether the call changed anything.
    pub fn mark_read(&self, id: NotificationId) -> Result<bool, DispatchError> {
        let mut n = self
            .notifications
            .get_mut(&id)
            .ok_or(DispatchError::NotificationNotFound(id))?;
        let changed = !n.is_read;
        n.is_read = true;
        Ok(changed)
    }

    /// Mark every notification of a user read; idempotent
    ///
    /// Returns how many records changed.
    pub fn mark_all_read(&self, user_id: UserId) -> usize {
        let ids: Vec<NotificationId> = match self.by_user.get(&user_id) {
            Some(entry) => entry.clone(),
            None => return 0,
        };
        let mut changed = 0;
        for id in ids {
            if let Some(mut n) = self.notifications.get_mut(&id) {
                if !n.is_read {
                    n.is_read = true;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Unread notifications for a user, oldest first
    #[must_use]
    pub fn unread_for(&self, user_id: UserId) -> Vec<Notification> {
        self.for_user(user_id, true)
    }

    /// All notifications for a user, oldest first
    #[must_use]
    pub fn all_for(&self, user_id: UserId) -> Vec<Notification> {
        self.for_user(user_id, false)
    }

    /// Unread count for a user
    #[must_use]
    pub fn unread_count(&self, user_id: UserId) -> usize {
        self.unread_for(user_id).len()
    }

    fn for_user(&self, user_id: UserId, unread_only: bool) -> Vec<Notification> {
        let ids: Vec<NotificationId> = match self.by_user.get(&user_id) {
            Some(entry) => entry.clone(),
            None => return Vec::new(),
        };
        ids.iter()
            .filter_map(|id| self.notifications.get(id).map(|n| n.clone()))
            .filter(|n| !unread_only || !n.is_read)
            .collect()
    }
}
