pub mod catalog;
pub mod cookies;
pub mod engine;
pub mod failover;
pub mod fetcher;
pub mod login;
pub mod reload;

pub use crate::domain::model::{ServerDescriptor, SessionData, StoredPreferences};
pub use crate::domain::ports::{LoginApi, Platform, SessionSource};
pub use crate::utils::error::Result;
