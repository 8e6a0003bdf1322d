pub mod assign;
pub mod draw;
pub mod eligibility;
pub mod invite;
pub mod recorder;
pub mod sampler;

pub use crate::domain::model::{DrawRequest, Group, Roster, StudentRecord};
pub use crate::domain::ports::{ConfigProvider, Notifier, RosterStore};
pub use crate::utils::error::Result;
