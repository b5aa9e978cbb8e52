//! Driving port for user-facing profile queries.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Counted, Error, Principal, UserId, UserProfile};

/// Profiles resolve `is_subscribed` against the viewer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Users ordered by id.
    async fn list_users(
        &self,
        viewer: Option<Principal>,
        page: PageRequest,
    ) -> Result<Counted<UserProfile>, Error>;

    /// One profile; `NotFound` for unknown ids.
    async fn user_profile(
        &self,
        viewer: Option<Principal>,
        id: UserId,
    ) -> Result<UserProfile, Error>;
}
