use std::fmt;
use std::path::PathBuf;

use crate::environment::Environment;
use crate::error::ExecStatus;

/// A single blocking process launch.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Spawn `launch_path` with `args`.
    Launch {
        launch_path: PathBuf,
        args: Vec<String>,
    },
    /// Feed `script` to a shell started through `launch_path`. `arguments` is a
    /// single string that the launch shell splits into positional parameters.
    Script {
        launch_path: PathBuf,
        script: String,
        arguments: String,
    },
}

impl Invocation {
    pub fn launch<I, S>(launch_path: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::Launch {
            launch_path: launch_path.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn script(
        launch_path: impl Into<PathBuf>,
        script: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Invocation::Script {
            launch_path: launch_path.into(),
            script: script.into(),
            arguments: arguments.into(),
        }
    }

    pub fn launch_path(&self) -> &PathBuf {
        match self {
            Invocation::Launch { launch_path, .. } | Invocation::Script { launch_path, .. } => {
                launch_path
            }
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Launch { launch_path, args } => {
                write!(f, "{}", launch_path.display())?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Invocation::Script {
                launch_path,
                arguments,
                ..
            } => write!(f, "{} <script> {}", launch_path.display(), arguments),
        }
    }
}

/// Runs invocations to completion and reports the exit code.
pub trait Executor {
    fn exec(&mut self, invocation: &Invocation, env: &Environment) -> ExecStatus;
}
