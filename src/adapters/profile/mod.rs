//! Business profile lookup adapters

mod in_memory;
mod postgres_lookup;

pub use in_memory::InMemoryBusinessProfileLookup;
pub use postgres_lookup::PgBusinessProfileLookup;
