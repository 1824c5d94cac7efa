//! Background Tasks Module
//!
//! Contains work that runs after the HTTP response has been sent.
//!
//! # Tasks
//! - Notification delivery: sends a confirmation or receipt email and
//!   records the outcome on the persisted record

mod notification;

pub use notification::{spawn_notification_task, Delivery};
