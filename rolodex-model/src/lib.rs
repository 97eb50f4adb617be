//! Core data model definitions shared across Rolodex crates.
#![allow(missing_docs)]

pub mod contact;
pub mod page;

pub use contact::{Contact, NewContact};
pub use page::{Page, PageRequest, Sort, SortDirection};
