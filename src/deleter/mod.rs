pub mod orchestrator;

pub use orchestrator::TagDeleter;
