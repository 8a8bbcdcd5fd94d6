use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use swish::config::ConfigLoader;
use swish::{Swish, logging};

#[derive(Parser)]
#[command(author, version, about = "Run a shell, bundle exec or fastlane with PATH lookup")]
struct Cli {
    /// key=value config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Launch shell, overrides the config file
    #[arg(long, global = true)]
    shell: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the shell with the given arguments
    Sh {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a command line through `<shell> -c`
    Run { command: String },
    /// Run a script file; remaining words become its arguments
    Script {
        file: PathBuf,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        arguments: Vec<String>,
    },
    /// bundle exec through the bundler found on PATH
    BundleExec {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Run fastlane, via bundler when available
    Fastlane {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the preferred executable for a name fragment
    Which { fragment: String },
}

fn main() -> anyhow::Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConfigLoader::default_config(),
    };
    if let Some(shell) = cli.shell {
        config.shell = shell;
    }

    let mut swish = Swish::from_config(&config);
    let code = match cli.command {
        Command::Sh { args } => swish.sh(&args)?,
        Command::Run { command } => swish.sh_command(&command)?,
        Command::Script { file, arguments } => {
            let script = fs::read_to_string(&file)
                .with_context(|| format!("failed to read script {}", file.display()))?;
            swish.execute(&script, &arguments.join(" "))?
        }
        Command::BundleExec { args } => swish.bundle_exec(&args)?,
        Command::Fastlane { args } => swish.fastlane(&args)?,
        Command::Which { fragment } => match swish.resolve(&fragment) {
            Some(path) => {
                println!("{}", path.display());
                0
            }
            None => {
                log::warn!("{} not found in PATH", fragment);
                1
            }
        },
    };

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
