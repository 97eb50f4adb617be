use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use rolodex_model::{Contact, Page, PageRequest, Sort, SortDirection};
use tokio::sync::RwLock;

use crate::database::ports::contacts::ContactRepository;
use crate::error::{ContactError, Result};

/// Process-local contact storage.
///
/// Used when no database URL is configured and throughout the test suites.
/// Every call takes the lock once, so each operation is atomic on its own.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    contacts: RwLock<HashMap<String, Contact>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contacts.read().await.is_empty()
    }
}

fn compare(sort: &Sort, a: &Contact, b: &Contact) -> Result<Ordering> {
    let primary = match sort.property {
        "name" => a.name.cmp(&b.name),
        "email" => a.email.cmp(&b.email),
        "id" => Ordering::Equal,
        other => {
            return Err(ContactError::Validation(format!(
                "cannot sort contacts by {other}"
            )));
        }
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };

    let descending_id =
        sort.property == "id" && sort.direction == SortDirection::Desc;
    let tiebreak = if descending_id {
        b.id.cmp(&a.id)
    } else {
        a.id.cmp(&b.id)
    };
    Ok(primary.then(tiebreak))
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>> {
        Ok(self.contacts.read().await.get(id).cloned())
    }

    async fn find_all_sorted(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Contact>> {
        // Validate the sort property even when the store is empty.
        let blank = Contact::default();
        compare(&request.sort, &blank, &blank)?;

        let contacts = self.contacts.read().await;
        let mut all: Vec<&Contact> = contacts.values().collect();
        all.sort_by(|a, b| {
            compare(&request.sort, a, b).unwrap_or(Ordering::Equal)
        });

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        let content = all
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();

        Ok(Page::new(content, request, contacts.len() as u64))
    }

    async fn save(&self, contact: Contact) -> Result<Contact> {
        self.contacts
            .write()
            .await
            .insert(contact.id.clone(), contact.clone());
        Ok(contact)
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.contacts.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, name: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            ..Contact::default()
        }
    }

    #[tokio::test]
    async fn pages_are_sorted_by_name_then_id() {
        let repo = InMemoryContactRepository::new();
        let rows = [("3", "Cleo"), ("1", "Abe"), ("4", "Abe"), ("2", "Bea")];
        for (id, name) in rows {
            repo.save(contact(id, name)).await.unwrap();
        }

        let first = repo
            .find_all_sorted(&PageRequest::new(0, 3, Sort::ascending("name")))
            .await
            .unwrap();
        let ids: Vec<_> = first.content.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["1", "4", "2"]);
        assert_eq!(first.total_elements, 4);
        assert_eq!(first.total_pages, 2);

        let second = repo
            .find_all_sorted(&PageRequest::new(1, 3, Sort::ascending("name")))
            .await
            .unwrap();
        assert_eq!(second.content.len(), 1);
        assert_eq!(second.content[0].id, "3");
        assert!(second.last);
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let repo = InMemoryContactRepository::new();
        repo.save(contact("1", "Abe")).await.unwrap();
        repo.save(contact("1", "Abraham")).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id("1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Abraham");
    }

    #[tokio::test]
    async fn delete_reports_whether_record_existed() {
        let repo = InMemoryContactRepository::new();
        repo.save(contact("1", "Abe")).await.unwrap();

        assert!(repo.delete_by_id("1").await.unwrap());
        assert!(!repo.delete_by_id("1").await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_sort_property_is_rejected() {
        let repo = InMemoryContactRepository::new();
        let request = PageRequest::new(0, 10, Sort::ascending("shoe_size"));
        let err = repo
            .find_all_sorted(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }
}
