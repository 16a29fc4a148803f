//! Domain - ドメインモデル（ids, profile, task, state, errors, events）

pub mod errors;
pub mod events;
pub mod ids;
pub mod profile;
pub mod state;
pub mod task;

pub use errors::{ErrorKind, RosterError};
pub use events::DomainEvent;
pub use ids::{TaskId, UserId};
pub use profile::{Credits, ProfileFields, ProfileRecord};
pub use state::TaskState;
pub use task::{ScheduledTask, TaskKind};
