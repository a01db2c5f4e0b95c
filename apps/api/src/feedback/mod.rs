// Feedback ledger: append-only optimization log and user rejection lookups.

pub mod handlers;
pub mod ledger;
pub mod postgres;
