pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod replication;
pub mod resources;
pub mod settings;
pub mod stack;
pub mod template;

pub use config::{ContextConfig, ContextFile, TaskConfig};
pub use engine::{EndpointType, EngineName, MigrationType};
pub use error::{DmsError, DmsResult};
pub use stack::DmsStack;
