// Job postings: storage seam with PostgreSQL and in-memory backends,
// the search/suggest engine on top of it, and the HTTP handlers.

pub mod handlers;
pub mod memory_store;
pub mod pg_store;
pub mod search;
pub mod store;
