//! # Rolodex Core
//!
//! Contact persistence and photo storage for the Rolodex contact service.
//!
//! ## Overview
//!
//! - **Contact Service**: list, lookup, create and delete contacts, and attach
//!   a photo to an existing contact
//! - **Photo Store**: collision-safe, atomic photo writes into one directory,
//!   plus sanitized reads by stored filename
//! - **Repository port**: keyed storage with PostgreSQL and in-memory adapters
//! - **Pagination**: page/size normalization for name-ordered listings
//!
//! ## Feature Flags
//!
//! - `database`: PostgreSQL repository and embedded migrations (SQLx)
//! - `postgres-tests`: runs the repository tests against `DATABASE_URL`
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Contact persistence ports and adapters
pub mod database;

/// Error types and error handling utilities
pub mod error;

/// Page request normalization
pub mod pagination;

/// Photo filename rules and on-disk storage
pub mod photo;

/// Contact CRUD and photo upload orchestration
pub mod service;

#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use database::{ContactRepository, InMemoryContactRepository};
#[cfg(feature = "database")]
pub use database::PostgresContactRepository;
pub use error::{ContactError, Result};
pub use photo::{Photo, PhotoStore, StoredPhoto};
pub use rolodex_model::{
    Contact, NewContact, Page, PageRequest, Sort, SortDirection,
};
pub use service::ContactService;
