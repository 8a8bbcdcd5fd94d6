pub mod config;
pub mod environment;
pub mod error;
pub mod executor;
pub mod logging;
pub mod tools;

pub use error::{ExecError, ExecStatus};
pub use executor::PathResolver;
pub use tools::Swish;
