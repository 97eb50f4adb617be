use std::fmt;

/// A single person's contact record.
///
/// Profile fields are carried through storage and transport untouched. The
/// `photo_url` is only ever written by the photo upload workflow.
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub photo_url: Option<String>,
}

impl fmt::Debug for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contact")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("photo_url", &self.photo_url)
            .finish_non_exhaustive()
    }
}

/// Create payload for a contact.
///
/// `id` is optional; the service assigns one when it is missing or blank.
/// `photo_url` is accepted so existing clients keep deserializing, but it is
/// never persisted through this path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NewContact {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<String>,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub photo_url: Option<String>,
}

impl NewContact {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The client-chosen identifier, if one was supplied and is not blank.
    pub fn requested_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Builds the record to persist. Any supplied `photo_url` is dropped.
    pub fn into_contact(self, id: String) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            title: self.title,
            phone: self.phone,
            address: self.address,
            status: self.status,
            photo_url: None,
        }
    }
}

impl From<Contact> for NewContact {
    fn from(contact: Contact) -> Self {
        Self {
            id: Some(contact.id),
            name: contact.name,
            email: contact.email,
            title: contact.title,
            phone: contact.phone,
            address: contact.address,
            status: contact.status,
            photo_url: contact.photo_url,
        }
    }
}
