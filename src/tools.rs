//! Convenience wrappers for launching a shell, `bundle exec` and fastlane.
//!
//! Every wrapper blocks until the child exits and returns its exit code. Output
//! is never captured; it goes straight to the inherited terminal.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::environment::Environment;
use crate::error::{ExecError, ExecStatus};
use crate::executor::{DefaultExecutor, Executor, Invocation, PathResolver};

pub const BUNDLER: &str = "bundler";
pub const FASTLANE: &str = "fastlane";

pub struct Swish<E: Executor = DefaultExecutor> {
    executor: E,
    env: Environment,
    shell: PathBuf,
}

impl Swish<DefaultExecutor> {
    /// Process environment with `config` layered on top.
    pub fn from_config(config: &Config) -> Self {
        let mut env = Environment::new();
        config.apply(&mut env);
        Swish::new(DefaultExecutor, env, config.shell.clone())
    }
}

impl<E: Executor> Swish<E> {
    pub fn new(executor: E, env: Environment, shell: impl Into<PathBuf>) -> Self {
        Swish {
            executor,
            env,
            shell: shell.into(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Looks up `fragment` against the current `PATH`.
    pub fn resolve(&self, fragment: &str) -> Option<PathBuf> {
        PathResolver::from_env(&self.env).resolve(fragment)
    }

    /// Runs the default shell with `args`.
    pub fn sh<S: AsRef<str>>(&mut self, args: &[S]) -> ExecStatus {
        let shell = self.shell.clone();
        self.sh_with(&shell, args)
    }

    pub fn sh_with<S: AsRef<str>>(&mut self, launch_path: &Path, args: &[S]) -> ExecStatus {
        let invocation = Invocation::launch(launch_path, args.iter().map(|a| a.as_ref()));
        self.executor.exec(&invocation, &self.env)
    }

    /// `sh -c <command>`
    pub fn sh_command(&mut self, command: &str) -> ExecStatus {
        self.sh(&["-c", command])
    }

    /// Runs an arbitrary shell script. `arguments` is one string; the shell
    /// splits it into `$1`, `$2`, ... honouring quotes.
    pub fn execute(&mut self, script: &str, arguments: &str) -> ExecStatus {
        let invocation = Invocation::script(&self.shell, script, arguments);
        self.executor.exec(&invocation, &self.env)
    }

    /// `bundle exec <args>` through the bundler found on `PATH`.
    pub fn bundle_exec<S: AsRef<str>>(&mut self, args: &[S]) -> ExecStatus {
        let bundler = self
            .resolve(BUNDLER)
            .ok_or_else(|| ExecError::ToolNotFound(BUNDLER.to_string()))?;
        let script = format!("{} exec \"$@\"", bundler.display());
        self.execute(&script, &join_args(args))
    }

    /// Runs fastlane through bundler, or the fastlane on `PATH` when bundler
    /// itself is missing.
    pub fn fastlane<S: AsRef<str>>(&mut self, args: &[S]) -> ExecStatus {
        let mut bundled = vec![FASTLANE];
        bundled.extend(args.iter().map(|a| a.as_ref()));

        match self.bundle_exec(bundled.as_slice()) {
            Err(e) if e.is_tool_not_found() => {
                log::warn!("{} not found, looking for {} directly", BUNDLER, FASTLANE);
            }
            other => return other,
        }

        let fastlane = self
            .resolve(FASTLANE)
            .ok_or_else(|| ExecError::ToolNotFound(FASTLANE.to_string()))?;
        let script = format!("{} \"$@\"", fastlane.display());
        self.execute(&script, &join_args(args))
    }
}

fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter().map(|a| a.as_ref()).collect::<Vec<_>>().join(" ")
}
