use std::fs::File;
use std::io::{self, Write};
use std::os::fd::OwnedFd;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use nix::sys::signal::Signal;

use crate::environment::Environment;
use crate::error::{ExecError, ExecStatus};
use super::executor::{Executor, Invocation};

/// Shell that reads the script from stdin inside the launch shell. Absolute so
/// a `PATH` without `/bin` still runs scripts.
const SCRIPT_SHELL: &str = "/bin/sh";

/// Spawns real processes with inherited stdio and waits for them.
pub struct DefaultExecutor;

impl Executor for DefaultExecutor {
    fn exec(&mut self, invocation: &Invocation, env: &Environment) -> ExecStatus {
        log::info!("running {}", invocation);
        match invocation {
            Invocation::Launch { launch_path, args } => self.exec_launch(launch_path, args, env),
            Invocation::Script {
                launch_path,
                script,
                arguments,
            } => self.exec_script(launch_path, script, arguments, env),
        }
    }
}

impl DefaultExecutor {
    fn exec_launch(&mut self, launch_path: &Path, args: &[String], env: &Environment) -> ExecStatus {
        let mut command = prepare_command(launch_path, env);
        command.args(args);

        let mut child = spawn(&mut command, launch_path)?;
        let status = child.wait()?;
        Ok(exit_code(status, launch_path))
    }

    fn exec_script(
        &mut self,
        launch_path: &Path,
        script: &str,
        arguments: &str,
        env: &Environment,
    ) -> ExecStatus {
        let (pipe_read, pipe_write) = script_pipe()?;

        let mut command = prepare_command(launch_path, env);
        command
            .arg("-c")
            .arg(format!("{} -s -- {}", SCRIPT_SHELL, arguments))
            .stdin(Stdio::from(pipe_read));

        let mut child = spawn(&mut command, launch_path)?;
        // The command still owns our copy of the read end; the child only
        // sees EOF once it is closed.
        drop(command);

        let mut writer = File::from(pipe_write);
        let written = writer.write_all(script.as_bytes());
        drop(writer);

        let status = child.wait()?;
        match written {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(ExecError::Io(e)),
            Err(_) => log::debug!("{} exited before reading the whole script", launch_path.display()),
            Ok(()) => {}
        }
        Ok(exit_code(status, launch_path))
    }
}

/// A pipe whose ends are not inherited across exec; the child only gets the
/// read end as its stdin.
#[cfg(not(target_vendor = "apple"))]
fn script_pipe() -> Result<(OwnedFd, OwnedFd), ExecError> {
    use nix::fcntl::OFlag;

    Ok(nix::unistd::pipe2(OFlag::O_CLOEXEC)?)
}

// No pipe2 on Apple platforms; the flag is set right after creation instead.
#[cfg(target_vendor = "apple")]
fn script_pipe() -> Result<(OwnedFd, OwnedFd), ExecError> {
    use nix::fcntl::{FcntlArg, FdFlag, fcntl};
    use std::os::fd::AsRawFd;

    let (read, write) = nix::unistd::pipe()?;
    for fd in [&read, &write] {
        fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;
    }
    Ok((read, write))
}

fn prepare_command(launch_path: &Path, env: &Environment) -> Command {
    let mut command = Command::new(launch_path);
    command
        .env_clear()
        .envs(env.exported_vars())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    command
}

fn spawn(command: &mut Command, launch_path: &Path) -> Result<Child, ExecError> {
    command.spawn().map_err(|source| ExecError::Spawn {
        program: launch_path.display().to_string(),
        source,
    })
}

/// The child's exit code, or `128 + signo` when it was killed by a signal.
fn exit_code(status: ExitStatus, launch_path: &Path) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    match status.signal() {
        Some(signo) => {
            let name = Signal::try_from(signo)
                .map(Signal::as_str)
                .unwrap_or("unknown signal");
            log::warn!("{} terminated by {}", launch_path.display(), name);
            128 + signo
        }
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(args: &[&str]) -> Invocation {
        Invocation::launch("/bin/sh", args.iter().copied())
    }

    #[test]
    fn test_returns_exit_code() {
        let env = Environment::new();
        let mut exec = DefaultExecutor;
        assert_eq!(exec.exec(&sh(&["-c", "exit 0"]), &env).unwrap(), 0);
        assert_eq!(exec.exec(&sh(&["-c", "exit 3"]), &env).unwrap(), 3);
    }

    #[test]
    fn test_passes_only_exported_vars() {
        let mut env = Environment::empty();
        env.set("SWISH_PROBE", "yes");
        let probe = sh(&["-c", "test \"$SWISH_PROBE\" = yes"]);

        let mut exec = DefaultExecutor;
        assert_eq!(exec.exec(&probe, &env).unwrap(), 1);

        env.export("SWISH_PROBE");
        assert_eq!(exec.exec(&probe, &env).unwrap(), 0);
    }

    #[test]
    fn test_signal_death_maps_to_128_plus_signo() {
        let env = Environment::new();
        let mut exec = DefaultExecutor;
        let code = exec.exec(&sh(&["-c", "kill -TERM $$"]), &env).unwrap();
        assert_eq!(code, 128 + Signal::SIGTERM as i32);
    }

    #[test]
    fn test_missing_launch_path_is_spawn_error() {
        let env = Environment::new();
        let mut exec = DefaultExecutor;
        let err = exec
            .exec(&Invocation::launch("/nonexistent/swish-shell", ["-c", "true"]), &env)
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn test_script_without_arguments() {
        let env = Environment::new();
        let mut exec = DefaultExecutor;
        let script = Invocation::script("/bin/sh", "#!/bin/sh\nexit 5", "");
        assert_eq!(exec.exec(&script, &env).unwrap(), 5);
    }

    #[test]
    fn test_script_arguments_are_split_by_the_shell() {
        let env = Environment::new();
        let mut exec = DefaultExecutor;
        let script = Invocation::script(
            "/bin/sh",
            "#!/bin/sh\n[ \"$1\" = Roger ] && [ \"$2\" = that ] || exit 7",
            "Roger that",
        );
        assert_eq!(exec.exec(&script, &env).unwrap(), 0);
    }

    #[test]
    fn test_script_runs_without_sh_on_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut env = Environment::empty();
        env.set_exported("PATH", &tmp.path().display().to_string());

        let mut exec = DefaultExecutor;
        let script = Invocation::script("/bin/sh", "#!/bin/sh\nexit 5", "");
        assert_eq!(exec.exec(&script, &env).unwrap(), 5);
    }

    #[test]
    fn test_script_pipe_is_close_on_exec() {
        use nix::fcntl::{FcntlArg, FdFlag, fcntl};
        use std::os::fd::AsRawFd;

        let (read, write) = script_pipe().unwrap();
        for fd in [&read, &write] {
            let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFD).unwrap();
            assert!(FdFlag::from_bits_truncate(flags).contains(FdFlag::FD_CLOEXEC));
        }
    }

    #[test]
    fn test_script_quoted_arguments_stay_together() {
        let env = Environment::new();
        let mut exec = DefaultExecutor;
        let script = Invocation::script(
            "/bin/sh",
            "#!/bin/sh\n[ \"$#\" = 1 ] && [ \"$1\" = \"Roger that\" ] || exit 7",
            "\"Roger that\"",
        );
        assert_eq!(exec.exec(&script, &env).unwrap(), 0);
    }
}
