//! Petition Backend - signature and donation tracking server
//!
//! Collects petition signatures (unique by email) and donation events into
//! JSON record files, sends optional email confirmations, and serves
//! aggregate statistics. The [`worker`] module provides the offline cache
//! controller used by the static front-end.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod store;
pub mod tasks;
pub mod validation;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_notification_task;
