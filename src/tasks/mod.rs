pub mod orchestrator;
pub mod query;
pub mod service;
pub mod stats;

pub use orchestrator::TaskOrchestrator;
pub use service::TaskService;
