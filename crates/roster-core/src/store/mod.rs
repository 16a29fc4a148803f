//! Keyed in-memory tables owned by the registry.

mod profiles;
mod tasks;

pub use profiles::ProfileStore;
pub use tasks::TaskQueue;
