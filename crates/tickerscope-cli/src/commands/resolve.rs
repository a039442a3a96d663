use std::io::{self, Write};
use std::process::ExitCode;

use serde_json::json;

use tickerscope_core::{NotFoundReason, Resolution};

use crate::cli::ResolveArgs;
use crate::error::{CliError, EXIT_NOT_FOUND};

use super::AppContext;

pub async fn run(args: &ResolveArgs, ctx: &AppContext) -> Result<ExitCode, CliError> {
    let company = args.company_name();
    let resolution = ctx.resolver().resolve(&company).await;

    let mut stdout = io::stdout().lock();
    write_resolution(&company, &resolution, ctx.json, &mut stdout)?;
    Ok(ExitCode::from(exit_status(&resolution)))
}

fn exit_status(resolution: &Resolution) -> u8 {
    match resolution {
        Resolution::Found { .. } => 0,
        Resolution::NotFound(_) => EXIT_NOT_FOUND,
    }
}

pub(super) fn write_resolution<W: Write>(
    company: &str,
    resolution: &Resolution,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    if json {
        let value = match resolution {
            Resolution::Found { symbol, best_match } => json!({
                "query": company,
                "symbol": symbol,
                "match": best_match,
            }),
            Resolution::NotFound(reason) => json!({
                "query": company,
                "symbol": null,
                "reason": reason.to_string(),
                "notice": notice(reason),
            }),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    match resolution {
        Resolution::Found { symbol, .. } => {
            writeln!(out, "The ticker symbol for {company} is {symbol}")?;
        }
        Resolution::NotFound(reason) => writeln!(out, "{reason}")?,
    }
    Ok(())
}

fn notice(reason: &NotFoundReason) -> Option<&str> {
    match reason {
        NotFoundReason::NoMatches { notice } => notice.as_deref(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerscope_core::{SearchMatch, Symbol};

    fn found() -> Resolution {
        Resolution::Found {
            symbol: Symbol::parse("IBM").expect("valid"),
            best_match: SearchMatch {
                symbol: String::from("IBM"),
                name: Some(String::from("International Business Machines Corp")),
                region: Some(String::from("United States")),
                currency: Some(String::from("USD")),
                match_score: Some(0.8),
            },
        }
    }

    #[test]
    fn found_prints_the_ticker_sentence() {
        let mut out = Vec::new();
        write_resolution("IBM", &found(), false, &mut out).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "The ticker symbol for IBM is IBM\n"
        );
        assert_eq!(exit_status(&found()), 0);
    }

    #[test]
    fn not_found_prints_reason_and_exits_one() {
        let resolution = Resolution::NotFound(NotFoundReason::NoMatches { notice: None });
        let mut out = Vec::new();
        write_resolution("zzzz", &resolution, false, &mut out).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "No matching ticker found.\n");
        assert_eq!(exit_status(&resolution), EXIT_NOT_FOUND);
    }

    #[test]
    fn json_output_carries_provider_notice() {
        let resolution = Resolution::NotFound(NotFoundReason::NoMatches {
            notice: Some(String::from("rate limit")),
        });
        let mut out = Vec::new();
        write_resolution("ibm", &resolution, true, &mut out).expect("write");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["symbol"], serde_json::Value::Null);
        assert_eq!(value["notice"], "rate limit");
    }
}
