use std::io;
use thiserror::Error;

pub type ExecStatus = Result<i32, ExecError>;

#[derive(Error, Debug)]
pub enum ExecError {
    /// A required external tool could not be found on the search path.
    #[error("{0} not found in your system.")]
    ToolNotFound(String),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("nix errno: {0}")]
    Nix(#[from] nix::errno::Errno),
}

impl ExecError {
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, ExecError::ToolNotFound(_))
    }
}
