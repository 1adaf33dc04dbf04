use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use structcheck::{
    AttributeOrder, ParserConfig, StructureVerifier, VerificationResult, VerifyConfig,
};

#[derive(Debug, Parser)]
#[command(
    name = "structcheck",
    version,
    about = "Check that an XML file follows the tag and attribute layout of a template"
)]
struct Args {
    /// Document to check
    #[arg(value_name = "CANDIDATE")]
    candidate: PathBuf,
    /// Reference template the document must follow
    #[arg(short, long, value_name = "TEMPLATE")]
    format: PathBuf,
    /// Required root element name (e.g. Project)
    #[arg(short, long, value_name = "TAG")]
    root: Option<String>,
    /// Accept attributes in any order
    #[arg(long)]
    any_attribute_order: bool,
    /// Maximum element nesting depth (0 for unlimited)
    #[arg(long, default_value_t = ParserConfig::default().max_depth)]
    max_depth: u16,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn verify_config(&self) -> VerifyConfig {
        let defaults = ParserConfig::default();
        let mut config = VerifyConfig::new()
            .with_parser_config(ParserConfig::new(self.max_depth, defaults.max_size));
        if let Some(root) = &self.root {
            config = config.with_root(root.clone());
        }
        if self.any_attribute_order {
            config = config.with_attribute_order(AttributeOrder::Any);
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    candidate: String,
    format: String,
    result: &'a VerificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the candidate matched
fn run(args: Args) -> Result<bool> {
    let config = args.verify_config();
    debug!(?config, "verifying");

    let mut verifier =
        StructureVerifier::with_config(args.candidate.clone(), args.format.clone(), config);
    let result = verifier.verify();
    let cause = verifier.last_load_error().map(|e| e.to_string());

    let mut stdout = io::stdout().lock();
    if args.json {
        let report = Report {
            candidate: args.candidate.display().to_string(),
            format: args.format.display().to_string(),
            result: &result,
            cause,
        };
        serde_json::to_writer_pretty(&mut stdout, &report).context("failed to encode result")?;
        writeln!(stdout).context("failed to write stdout")?;
    } else {
        match &result {
            VerificationResult::Valid => writeln!(
                stdout,
                "ok: {} matches {}",
                args.candidate.display(),
                args.format.display()
            ),
            VerificationResult::Invalid(divergence) => {
                writeln!(stdout, "error[{}]: {divergence}", divergence.code())?;
                match cause {
                    Some(cause) => writeln!(stdout, "  caused by: {cause}"),
                    None => Ok(()),
                }
            }
        }
        .context("failed to write stdout")?;
    }

    Ok(result.is_valid())
}
