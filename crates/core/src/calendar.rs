//! Calendar synchronization seam.
//!
//! A goal with a deadline may be mirrored as an event in the user's external
//! calendar. The concrete client (OAuth, HTTP) lives outside this workspace;
//! the service only needs the removal capability, injected at construction.

use crate::errors::Result;
use async_trait::async_trait;
use log::debug;

/// Capability to remove the calendar event backing a goal.
///
/// Callers treat failures as non-fatal: the goal is deleted regardless of
/// whether its event could be removed.
#[async_trait]
pub trait CalendarSyncTrait: Send + Sync {
    async fn delete_event(&self, user_id: &str, event_id: &str) -> Result<()>;
}

/// No-op implementation for deployments without calendar federation.
pub struct NoopCalendarSync;

#[async_trait]
impl CalendarSyncTrait for NoopCalendarSync {
    async fn delete_event(&self, _user_id: &str, event_id: &str) -> Result<()> {
        debug!("Calendar sync disabled, skipping removal of event {}", event_id);
        Ok(())
    }
}
