#![doc = "The `taskhaven` library crate."]
#![doc = ""]
#![doc = "This crate contains the core business logic for the TaskHaven application:"]
#![doc = "domain models, the deterministic credential/token layer, the in-memory user"]
#![doc = "and task stores, and the session/task orchestrators that tie them together."]
#![doc = "It is used by the main binary (`main.rs`) to run the demo walkthrough."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;
pub mod tasks;

pub use crate::error::AppError;
pub use crate::session::{SessionHandle, SessionOrchestrator};
pub use crate::tasks::TaskOrchestrator;
