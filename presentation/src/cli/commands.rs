//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tribunal_domain::{DomainError, LatencyTier, RoundPolicy};

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round of the transcript followed by the verdict
    Full,
    /// Only the final verdict
    Verdict,
    /// The complete result, transcript included, as JSON
    Json,
}

impl From<OutputFormat> for tribunal_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Verdict => Self::Verdict,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Latency tier selecting the default model
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tier {
    /// gpt-4.1-mini
    Fast,
    /// gpt-4.1
    Quality,
}

impl From<Tier> for LatencyTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Fast => LatencyTier::Fast,
            Tier::Quality => LatencyTier::Quality,
        }
    }
}

/// CLI arguments for claim-tribunal
#[derive(Parser, Debug)]
#[command(name = "claim-tribunal")]
#[command(author, version, about = "Adversarial multi-agent verification of claims against their source")]
#[command(long_about = r#"
Claim Tribunal checks whether a claim faithfully represents its source text
by running a structured debate between LLM roles.

The debate has these rounds:
1. Stance: prosecutor, defense and epistemologist assess the claim independently
2. Cross-examination: each analyst attacks or concedes every opposing argument
3. Counter (optional, repeated): adversaries address each other's latest arguments
4. Synthesis: the jury foreman reads the transcript and delivers the verdict

Verdicts are faithful, mutated or ambiguous.

Configuration files are loaded from (in priority order):
1. TRIBUNAL_<SECTION>__<KEY> environment variables
2. --config <path>     Explicit config file
3. ./tribunal.toml     Project-level config
4. ~/.config/claim-tribunal/config.toml   Global config

Example:
  claim-tribunal "Less than 14,550 people have died" "More than 14,500 deaths have been confirmed"
  claim-tribunal --rounds 3 --tier quality -o full "<claim>" --source-file article.txt
  claim-tribunal --baseline -o json "<claim>" "<source>"
"#)]
pub struct Cli {
    /// The claim to verify
    pub claim: Option<String>,

    /// The source text the claim is checked against
    #[arg(conflicts_with = "source_file")]
    pub source: Option<String>,

    /// Read the source text from a file
    #[arg(long, value_name = "PATH")]
    pub source_file: Option<PathBuf>,

    /// Run exactly N rounds (minimum 2)
    #[arg(long, value_name = "N", conflicts_with = "random_rounds")]
    pub rounds: Option<u32>,

    /// Draw the round count once from an inclusive range
    #[arg(long, value_name = "MIN-MAX")]
    pub random_rounds: Option<String>,

    /// Latency tier (ignored when --model is given)
    #[arg(long, value_enum)]
    pub tier: Option<Tier>,

    /// Model serving every role
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Also run the single-call verifier and compare verdicts
    #[arg(long)]
    pub baseline: bool,

    /// Append one JSON record per gateway call to this file
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Round policy requested on the command line, if any
    pub fn round_policy(&self) -> Option<Result<RoundPolicy, DomainError>> {
        if let Some(n) = self.rounds {
            return Some(RoundPolicy::fixed(n));
        }
        self.random_rounds
            .as_deref()
            .map(RoundPolicy::parse_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("claim-tribunal").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_claim_and_source() {
        let cli = parse(&["the claim", "the source"]);
        assert_eq!(cli.claim.as_deref(), Some("the claim"));
        assert_eq!(cli.source.as_deref(), Some("the source"));
        assert!(cli.round_policy().is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_fixed_rounds() {
        let cli = parse(&["--rounds", "3", "c", "s"]);
        assert_eq!(
            cli.round_policy().unwrap().unwrap(),
            RoundPolicy::FixedRounds(3)
        );
    }

    #[test]
    fn test_random_rounds() {
        let cli = parse(&["--random-rounds", "2-5", "c", "s"]);
        assert_eq!(
            cli.round_policy().unwrap().unwrap(),
            RoundPolicy::RandomRounds { min: 2, max: 5 }
        );
    }

    #[test]
    fn test_invalid_rounds_reported() {
        let cli = parse(&["--rounds", "1", "c", "s"]);
        assert!(cli.round_policy().unwrap().is_err());
    }

    #[test]
    fn test_round_flags_conflict() {
        let result = Cli::try_parse_from([
            "claim-tribunal",
            "--rounds",
            "3",
            "--random-rounds",
            "2-4",
            "c",
            "s",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_file_conflicts_with_source() {
        let result = Cli::try_parse_from(["claim-tribunal", "c", "s", "--source-file", "a.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "-vv", "-q", "--baseline", "--tier", "quality", "-o", "json", "c", "s",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert!(cli.baseline);
        assert_eq!(cli.tier, Some(Tier::Quality));
        assert_eq!(
            tribunal_domain::OutputFormat::from(cli.output.unwrap()),
            tribunal_domain::OutputFormat::Json
        );
    }
}
