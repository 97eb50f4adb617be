//! Contact persistence: the repository port and its adapters.

pub mod infrastructure;
pub mod ports;

pub use infrastructure::InMemoryContactRepository;
#[cfg(feature = "database")]
pub use infrastructure::PostgresContactRepository;
pub use ports::contacts::ContactRepository;
