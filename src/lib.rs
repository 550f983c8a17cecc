pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::AppConfig;
pub use core::engine::{CycleOutcome, Localizer};
pub use core::login::LoginOutcome;
pub use domain::model::TriggerMessage;
pub use domain::ports::Platform;
pub use utils::error::{Result, UnblockError};
