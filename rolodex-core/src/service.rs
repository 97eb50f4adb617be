//! Contact CRUD and the photo upload workflow.

use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use rolodex_model::{Contact, NewContact, Page};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::database::ContactRepository;
use crate::error::{ContactError, Result};
use crate::pagination::contact_page_request;
use crate::photo::{Photo, PhotoStore};

/// Sequences the contact repository and the photo store.
///
/// The photo store never touches the repository; every cross-cutting rule
/// lives here. A contact's `photo_url` is only changed after its file has been
/// written, and only through a single `save`.
#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
    photos: Arc<PhotoStore>,
    remove_photo_on_delete: bool,
}

impl fmt::Debug for ContactService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactService")
            .field("contacts", &type_name_of_val(self.contacts.as_ref()))
            .field("photos", &self.photos.directory())
            .field("remove_photo_on_delete", &self.remove_photo_on_delete)
            .finish()
    }
}

impl ContactService {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        photos: Arc<PhotoStore>,
    ) -> Self {
        Self {
            contacts,
            photos,
            remove_photo_on_delete: false,
        }
    }

    /// Also delete a contact's stored photo when the contact is deleted.
    pub fn with_photo_cleanup(mut self, enabled: bool) -> Self {
        self.remove_photo_on_delete = enabled;
        self
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub async fn list_contacts(
        &self,
        page: i64,
        size: i64,
    ) -> Result<Page<Contact>> {
        let request = contact_page_request(page, size)?;
        self.contacts
            .find_all_sorted(&request)
            .await
            .inspect_err(|e| error!("Failed to list contacts: {}", e))
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact> {
        self.contacts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ContactError::contact_not_found(id))
    }

    /// Persists a new contact and returns the stored representation.
    ///
    /// A blank or missing id is replaced with a fresh UUID. A `photo_url` in
    /// the payload is discarded; photos are only attached through
    /// [`ContactService::upload_photo`]. Re-creating an existing id replaces
    /// the profile fields but keeps the stored `photo_url`.
    pub async fn create_contact(&self, draft: NewContact) -> Result<Contact> {
        let (id, existing_photo_url) = match draft.requested_id() {
            Some(id) => {
                let id = validate_contact_id(id)?.to_string();
                let photo_url = self
                    .contacts
                    .find_by_id(&id)
                    .await?
                    .and_then(|existing| existing.photo_url);
                (id, photo_url)
            }
            None => (Uuid::new_v4().to_string(), None),
        };

        if draft.photo_url.is_some() {
            warn!(
                contact_id = %id,
                "ignoring client-supplied photoUrl on create"
            );
        }

        let mut contact = draft.into_contact(id);
        contact.photo_url = existing_photo_url;

        let saved = self.contacts.save(contact).await?;
        info!(contact_id = %saved.id, "Created contact");
        Ok(saved)
    }

    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        let photo_url = if self.remove_photo_on_delete {
            self.contacts
                .find_by_id(id)
                .await?
                .and_then(|contact| contact.photo_url)
        } else {
            None
        };

        if !self.contacts.delete_by_id(id).await? {
            return Err(ContactError::contact_not_found(id));
        }
        info!(contact_id = %id, "Deleted contact");

        if let Some(filename) = photo_url
            .as_deref()
            .and_then(|url| self.photos.filename_from_url(url))
        {
            match self.photos.remove(filename).await {
                Ok(_) => {
                    info!(contact_id = %id, filename, "Removed contact photo")
                }
                Err(e) => warn!(
                    contact_id = %id,
                    filename,
                    "Failed to remove contact photo: {}",
                    e
                ),
            }
        }

        Ok(())
    }

    /// Stores a photo for an existing contact and records its URL.
    ///
    /// Nothing is written for an unknown contact. If the file write fails the
    /// record is left untouched; the save is only attempted after the write
    /// succeeded.
    pub async fn upload_photo(
        &self,
        id: &str,
        file_name: Option<&str>,
        content: &[u8],
    ) -> Result<String> {
        info!(
            contact_id = %id,
            bytes = content.len(),
            "Uploading photo for contact"
        );

        let mut contact = self
            .contacts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ContactError::contact_not_found(id))?;

        let stored = self
            .photos
            .store(id, file_name, content)
            .await
            .map_err(|e| {
                error!(contact_id = %id, "Failed to write photo: {}", e);
                ContactError::upload_failed(e)
            })?;

        contact.photo_url = Some(stored.url.clone());
        self.contacts.save(contact).await.map_err(|e| {
            error!(contact_id = %id, "Failed to record photo url: {}", e);
            ContactError::upload_failed(e)
        })?;

        Ok(stored.url)
    }

    pub async fn get_photo(&self, filename: &str) -> Result<Photo> {
        self.photos.read(filename).await
    }
}

/// Client-chosen ids end up in photo filenames, so they may not contain path
/// separators or control characters, and may not start with a dot.
fn validate_contact_id(id: &str) -> Result<&str> {
    let forbidden = |c: char| matches!(c, '/' | '\\') || c.is_control();
    if id.starts_with('.') || id.chars().any(forbidden) {
        return Err(ContactError::Validation(format!(
            "invalid contact id {id:?}"
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryContactRepository;
    use crate::database::ports::contacts::MockContactRepository;
    use tempfile::TempDir;

    fn service_with(
        repo: Arc<dyn ContactRepository>,
    ) -> (ContactService, TempDir) {
        let dir = tempfile::tempdir().expect("tmpdir");
        let photos = Arc::new(PhotoStore::new(dir.path().join("photos")));
        (ContactService::new(repo, photos), dir)
    }

    fn in_memory_service() -> (ContactService, TempDir) {
        service_with(Arc::new(InMemoryContactRepository::new()))
    }

    fn existing(id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: "Grace".to_string(),
            ..Contact::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_uuid_when_id_missing() {
        let (service, _dir) = in_memory_service();

        let created = service
            .create_contact(NewContact::named("Grace"))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(service.get_contact(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_rejects_ids_with_separators() {
        let (service, _dir) = in_memory_service();

        let err = service
            .create_contact(NewContact::named("Mallory").with_id("../escape"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_dot_prefixed_ids() {
        let (service, _dir) = in_memory_service();

        let err = service
            .create_contact(NewContact::named("Mallory").with_id(".c-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }

    #[tokio::test]
    async fn recreating_a_contact_keeps_its_photo_url() {
        let (service, _dir) = in_memory_service();
        service
            .create_contact(NewContact::named("Grace").with_id("c-1"))
            .await
            .unwrap();
        let url = service
            .upload_photo("c-1", Some("a.jpg"), b"jpg")
            .await
            .unwrap();

        let recreated = service
            .create_contact(NewContact::named("Grace Hopper").with_id("c-1"))
            .await
            .unwrap();

        assert_eq!(recreated.name, "Grace Hopper");
        assert_eq!(recreated.photo_url.as_deref(), Some(url.as_str()));
        let stored = service.get_contact("c-1").await.unwrap();
        assert_eq!(
            stored.photo_url.as_deref(),
            Some("/contacts/image/c-1.jpg")
        );
    }

    #[tokio::test]
    async fn create_ignores_client_photo_url_for_new_ids() {
        let (service, _dir) = in_memory_service();
        let mut draft = NewContact::named("Grace").with_id("c-1");
        draft.photo_url = Some("https://elsewhere.example/g.png".into());

        let created = service.create_contact(draft).await.unwrap();
        assert!(created.photo_url.is_none());
    }

    #[tokio::test]
    async fn upload_does_not_save_when_write_fails() {
        let mut repo = MockContactRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(existing(id))));
        repo.expect_save().never();

        let dir = tempfile::tempdir().expect("tmpdir");
        let blocker = dir.path().join("photos");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let service = ContactService::new(
            Arc::new(repo),
            Arc::new(PhotoStore::new(&blocker)),
        );

        let err = service
            .upload_photo("c-1", Some("me.png"), b"png")
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn upload_wraps_save_failures() {
        let mut repo = MockContactRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(existing(id))));
        repo.expect_save()
            .times(1)
            .returning(|_| Err(ContactError::Storage("reset".into())));

        let (service, _dir) = service_with(Arc::new(repo));

        let err = service
            .upload_photo("c-1", Some("me.jpg"), b"jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn list_propagates_storage_errors() {
        let mut repo = MockContactRepository::new();
        repo.expect_find_all_sorted()
            .returning(|_| Err(ContactError::Storage("db down".into())));

        let (service, _dir) = service_with(Arc::new(repo));

        let err = service.list_contacts(0, 10).await.unwrap_err();
        assert!(matches!(err, ContactError::Storage(_)));
    }

    #[tokio::test]
    async fn list_validates_before_touching_storage() {
        let mut repo = MockContactRepository::new();
        repo.expect_find_all_sorted().never();

        let (service, _dir) = service_with(Arc::new(repo));

        let err = service.list_contacts(-1, 10).await.unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_with_cleanup_removes_photo_file() {
        let (service, _dir) = in_memory_service();
        let service = service.with_photo_cleanup(true);

        let created = service
            .create_contact(NewContact::named("Grace").with_id("c-1"))
            .await
            .unwrap();
        service
            .upload_photo(&created.id, Some("me.jpg"), b"jpg")
            .await
            .unwrap();
        let path = service.photos().directory().join("c-1.jpg");
        assert!(path.exists());

        service.delete_contact("c-1").await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn delete_without_cleanup_keeps_photo_file() {
        let (service, _dir) = in_memory_service();

        service
            .create_contact(NewContact::named("Grace").with_id("c-1"))
            .await
            .unwrap();
        service.upload_photo("c-1", None, b"png").await.unwrap();

        service.delete_contact("c-1").await.unwrap();
        assert!(service.photos().directory().join("c-1.png").exists());
    }
}
