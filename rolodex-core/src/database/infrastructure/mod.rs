pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

pub use memory::InMemoryContactRepository;
#[cfg(feature = "database")]
pub use postgres::PostgresContactRepository;
