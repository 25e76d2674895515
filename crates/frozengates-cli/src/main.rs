//! # frozengates
//!
//! Hook binary. Reads one JSON event from stdin and exits with the gate's
//! decision: 0 allow, 2 block, 1 when the stop gate cannot start.

#![deny(unsafe_code)]

use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use frozengates_changeset::{GitCli, ResolverOptions};
use frozengates_cli::{EXIT_FATAL, GateEnv, GateOutcome, run_pre_tool_use, run_stop};

/// Frozen-path and LOC-budget gates for agent tool calls.
#[derive(Parser, Debug)]
#[command(name = "frozengates", about = "Frozen-path and LOC-budget hook gates")]
struct Cli {
    /// Log filter for stderr diagnostics (overridden by `FROZENGATES_LOG`).
    #[arg(long, global = true, default_value = "off")]
    log_level: String,

    #[command(subcommand)]
    gate: Gate,
}

#[derive(Subcommand, Debug)]
enum Gate {
    /// Block writes and edits that target a frozen path.
    PreToolUse,
    /// Block session end while a changed file exceeds its LOC limit.
    Stop {
        /// Do not ask git for working-tree changes.
        #[arg(long)]
        skip_git: bool,
        /// Do not replay the session transcripts.
        #[arg(long)]
        skip_transcript: bool,
    },
}

fn read_stdin() -> String {
    std::io::read_to_string(std::io::stdin()).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "stdin unreadable, treating event as empty");
        String::new()
    })
}

fn emit(outcome: &GateOutcome) -> ExitCode {
    if outcome.is_block() {
        tracing::debug!(exit_code = outcome.exit_code, "gate blocked");
    }
    if let Some(stdout) = &outcome.stdout {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{stdout}");
        let _ = out.flush();
    }
    if let Some(stderr) = &outcome.stderr {
        let _ = writeln!(std::io::stderr().lock(), "{stderr}");
    }
    exit_code(outcome.exit_code)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run(cli: Cli) -> Result<GateOutcome> {
    let raw = read_stdin();
    let env = GateEnv::from_env();

    match cli.gate {
        Gate::PreToolUse => Ok(run_pre_tool_use(&raw, &env)),
        Gate::Stop {
            skip_git,
            skip_transcript,
        } => {
            let options = ResolverOptions {
                inspect_working_tree: !skip_git,
                replay_transcripts: !skip_transcript,
            };
            run_stop(&raw, &env, Arc::new(GitCli::default()), options).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    frozengates_core::logging::init_subscriber(&cli.log_level);

    match run(cli).await {
        Ok(outcome) => emit(&outcome),
        Err(e) => {
            eprintln!("frozengates: {e:#}");
            exit_code(EXIT_FATAL)
        }
    }
}
