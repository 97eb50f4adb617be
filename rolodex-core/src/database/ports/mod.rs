//! Repository ports (interfaces) consumed by the contact service.
//! Implementations live under `database::infrastructure`.

pub mod contacts;
