//! Prompt-driven session used when no subcommand is given.
//!
//! The session always writes text; `--json` only applies to the subcommands.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::debug;

use tickerscope_core::Resolution;

use crate::cli::{AnalyzeOptionsArgs, LiveOptionsArgs};
use crate::error::{CliError, EXIT_INVALID_CHOICE, EXIT_NOT_FOUND};

use super::{analyze, live, resolve, AppContext};

const WELCOME: &str = "Welcome to the Stock Analysis Tool!";
const COMPANY_PROMPT: &str = "Enter the Company Name: ";
const ACTION_PROMPT: &str =
    "What would you like to do? (1) Fetch live stock price (2) Perform stock analysis: ";
const INVALID_OPTION: &str = "Invalid option. Please enter 1 or 2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Live,
    Analyze,
}

impl Action {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Live),
            "2" => Some(Self::Analyze),
            _ => None,
        }
    }
}

pub async fn run(ctx: &AppContext) -> Result<ExitCode, CliError> {
    let mut input = io::stdin().lock();
    let mut stdout = io::stdout();
    let status = session(
        ctx,
        &mut input,
        &mut stdout,
        &LiveOptionsArgs::default(),
        &AnalyzeOptionsArgs::default(),
    )
    .await?;
    Ok(ExitCode::from(status))
}

/// Runs one session and returns the process exit status.
async fn session<R: BufRead, W: Write>(
    ctx: &AppContext,
    input: &mut R,
    out: &mut W,
    live_args: &LiveOptionsArgs,
    analyze_args: &AnalyzeOptionsArgs,
) -> Result<u8, CliError> {
    writeln!(out, "{WELCOME}")?;
    let company = prompt(input, out, COMPANY_PROMPT)?;

    let resolution = ctx.resolver().resolve(&company).await;
    resolve::write_resolution(&company, &resolution, false, out)?;
    let symbol = match resolution {
        Resolution::Found { symbol, .. } => symbol,
        Resolution::NotFound(_) => return Ok(EXIT_NOT_FOUND),
    };

    let choice = prompt(input, out, ACTION_PROMPT)?;
    debug!(%symbol, choice = %choice, "action chosen");
    match Action::from_choice(&choice) {
        Some(Action::Live) => live::stream(ctx, &symbol, live_args, false, out).await?,
        Some(Action::Analyze) => analyze::report(ctx, symbol, analyze_args, false, out).await?,
        None => {
            writeln!(out, "{INVALID_OPTION}")?;
            return Ok(EXIT_INVALID_CHOICE);
        }
    }
    Ok(0)
}

/// Writes `message` without a newline and reads one trimmed line.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> Result<String, CliError> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::Command(String::from(
            "input ended before an answer was given",
        )));
    }
    Ok(line.trim().to_owned())
}
