pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{csv_store::CsvRosterStore, outbox::FileOutbox};
pub use config::Settings;
pub use crate::core::{
    assign::assign_group,
    draw::{DrawEngine, MessagePlan},
};
pub use domain::model::{DrawRequest, Group, Roster, StudentRecord};
pub use utils::error::{Result, RosterError};
