// Keyword retrieval: ranked pools, compound splitting, and the pool listing API.

pub mod handlers;
pub mod postgres;
pub mod store;
