use async_trait::async_trait;
use rolodex_model::{Contact, Page, PageRequest};

use crate::error::Result;

/// Keyed, durable storage for contact records.
///
/// `save` and `delete_by_id` are all-or-nothing per call. No atomicity is
/// promised across calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>>;

    /// One page of contacts in the request's sort order, with `id` ascending
    /// as the tiebreaker.
    async fn find_all_sorted(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Contact>>;

    /// Inserts the contact, or replaces the stored record with the same id.
    async fn save(&self, contact: Contact) -> Result<Contact>;

    /// Returns `true` when a record existed and was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;
}
