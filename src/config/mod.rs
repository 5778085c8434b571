pub mod resolver;
pub mod types;

pub use resolver::{resolve, resolve_token, Inputs};
pub use types::DeletionRequest;
