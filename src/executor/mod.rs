mod executor;
mod default_executor;
mod mock;
mod path_resolver;

pub use crate::error::{ExecError, ExecStatus};
pub use executor::{Executor, Invocation};
pub use default_executor::DefaultExecutor;
pub use mock::MockExecutor;
pub use path_resolver::PathResolver;
