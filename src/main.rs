//! gitfixup - safe fixup + autosquash for git
//!
//! Binary entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gitfixup::config::{Config, ConfigOverrides};
use gitfixup::git::{GitExecutor, PublishedHistoryPolicy};
use gitfixup::model::{Notification, NotificationKind};
use gitfixup::view::LogPrinter;
use gitfixup::workflow::{
    AssumeYes, BufferState, Confirm, ErrorKind, FixupOrchestrator, HistoryView,
    RevisionValidator, TerminalPrompt, WhitespaceDiffDropper, WorkflowError,
};

#[derive(Debug, Parser)]
#[command(
    name = "gitfixup",
    version,
    about = "Fold staged changes into an earlier commit, or drop whitespace-only edits."
)]
struct Cli {
    /// Run as if started in this directory.
    #[arg(short = 'C', global = true)]
    directory: Option<PathBuf>,

    /// Answer yes to confirmation prompts.
    #[arg(long, global = true)]
    yes: bool,

    /// Allow rewriting commits already on a remote-tracking branch.
    #[arg(long, global = true)]
    allow_rewrite_published: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Commit the staged changes as a fixup of COMMIT and autosquash them in.
    Fixup {
        /// Commit to fold the staged changes into.
        commit: String,

        /// Print the last N commits afterwards.
        #[arg(long, value_name = "N")]
        log: Option<usize>,
    },
    /// Revert whitespace-only edits in FILE, keeping and staging the rest.
    DropWhitespace {
        /// File inside the working tree.
        file: PathBuf,
    },
    /// Validate a revision or range without changing anything.
    Check {
        /// Commit-ish, `A..B`, or `A...B`.
        revision: String,
    },
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    Ok(report(run(cli)))
}

/// Set up git and config, then dispatch the subcommand
fn run(cli: Cli) -> Result<Notification, WorkflowError> {
    let workdir = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !workdir.is_dir() {
        return Err(WorkflowError::NotAWorkingTree(workdir));
    }

    let executor = GitExecutor::new();
    executor.check_version(&workdir)?;

    let config = Config::load(&executor, &workdir).merge(ConfigOverrides {
        allow_rewrite_published: cli.allow_rewrite_published.then_some(true),
        assume_yes: cli.yes.then_some(true),
    });

    match cli.cmd {
        Command::Fixup { commit, log } => {
            let policy = PublishedHistoryPolicy::new(executor.clone(), config.allow_rewrite_published);
            let confirm: &dyn Confirm = if config.assume_yes {
                &AssumeYes
            } else {
                &TerminalPrompt
            };
            let mut printer = log.map(|n| LogPrinter::new(executor.clone(), n, io::stdout()));
            let view = printer.as_mut().map(|p| p as &mut dyn HistoryView);

            FixupOrchestrator::new(&executor, &policy, confirm)
                .run(&commit, &workdir, view)
                .map(|report| report.notification)
        }
        Command::DropWhitespace { file } => WhitespaceDiffDropper::new(&executor)
            .run(&workdir.join(file), BufferState::Saved)
            .map(|outcome| outcome.notification().clone()),
        Command::Check { revision } => RevisionValidator::new(&executor)
            .validate(&revision, &workdir)
            .map(|spec| Notification::info(format!("{} is valid", spec))),
    }
}

/// Print the outcome and pick the exit code
fn report(result: Result<Notification, WorkflowError>) -> ExitCode {
    match result {
        Ok(notification) => {
            match notification.kind {
                NotificationKind::Warning => eprintln!("warning: {}", notification),
                _ => println!("{}", notification),
            }
            ExitCode::SUCCESS
        }
        Err(e) if e.kind() == ErrorKind::Declined => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_before_mutation() {
                eprintln!("hint: nothing was changed");
            }
            ExitCode::from(2)
        }
    }
}
