//! CLI entrypoint for Claim Tribunal
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tribunal_application::{
    AuditLog, DebateError, DebateParams, NoAuditLog, RandomRoundCounter, RunDebateUseCase,
    VerifyClaimBaselineUseCase,
};
use tribunal_domain::{
    Claim, DebateComparison, LatencyTier, Model, OutputFormat, RoundPolicy, SourceText,
};
use tribunal_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLog, OpenAiGateway, OpenAiGatewayConfig,
};
use tribunal_presentation::{Cli, ConsoleFormatter, ProgressReporter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        println!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_config_issues(&issues));
        if issues.iter().any(|i| i.is_error()) {
            bail!("Invalid configuration");
        }
    }

    if !config.output.color_enabled(cli.no_color) {
        colored::control::set_override(false);
    }

    // === Input ===
    let Some(claim) = cli.claim.as_deref() else {
        bail!("A claim is required. See --help.");
    };
    let source = match (&cli.source, &cli.source_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file {}", path.display()))?,
        (None, None) => bail!("A source text is required (positional or --source-file)."),
    };
    let claim = Claim::try_new(claim)?;
    let source = SourceText::try_new(source)?;

    let params = debate_params(&cli, &config);
    let policy = match cli.round_policy() {
        Some(policy) => policy?,
        None => config.debate.to_round_policy().0,
    };
    let format = config.output.resolve_format(cli.output.map(Into::into));

    // === Dependency Injection ===
    let gateway_config =
        OpenAiGatewayConfig::from_env(&config.gateway.base_url, &config.gateway.api_key_env)?;
    let gateway = Arc::new(OpenAiGateway::new(gateway_config)?);
    let audit_log = audit_log(&cli, &config);

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    if !cli.quiet && format != OutputFormat::Json {
        print_header(&claim, &policy, &params.model);
    }

    let use_case = RunDebateUseCase::new(
        Arc::clone(&gateway),
        Arc::new(RandomRoundCounter::new()),
        params.clone(),
    )
    .with_audit_log(Arc::clone(&audit_log))
    .with_cancellation(cancellation.clone());

    let outcome = if cli.quiet {
        use_case
            .run_debate(claim.clone(), source.clone(), policy)
            .await
    } else {
        let progress = ProgressReporter::new();
        use_case
            .run_debate_with_progress(claim.clone(), source.clone(), policy, &progress)
            .await
    };

    let result = match outcome {
        Ok(result) => result,
        Err(DebateError::Cancelled) => bail!("Debate cancelled"),
        Err(DebateError::RunFailed(failure)) => {
            warn!(
                "Partial transcript has {} records over {} rounds",
                failure.partial_transcript.len(),
                failure.partial_transcript.rounds_completed()
            );
            if cli.verbose > 0 {
                eprintln!("{}", failure.partial_transcript.render_full());
            }
            return Err(anyhow!(failure));
        }
        Err(e) => return Err(e.into()),
    };
    info!("Debate completed in {} ms", result.duration_ms());

    // Optional single-call baseline
    let baseline = if cli.baseline {
        let baseline = VerifyClaimBaselineUseCase::new(gateway, params)
            .with_audit_log(audit_log)
            .with_cancellation(cancellation)
            .execute(claim, source)
            .await?;
        Some(baseline)
    } else {
        None
    };

    // Output results
    match (&baseline, format) {
        (Some(baseline), OutputFormat::Json) => {
            let combined = serde_json::json!({
                "debate": result,
                "baseline": baseline,
                "comparison": DebateComparison::new(&result, baseline),
            });
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
        (Some(baseline), _) => {
            println!("{}", ConsoleFormatter::render(&result, format));
            println!("{}", ConsoleFormatter::format_baseline(baseline));
            println!(
                "{}",
                ConsoleFormatter::format_comparison(&DebateComparison::new(&result, baseline))
            );
        }
        (None, _) => println!("{}", ConsoleFormatter::render(&result, format)),
    }

    Ok(())
}

/// File config first, then command-line overrides
fn debate_params(cli: &Cli, config: &FileConfig) -> DebateParams {
    let params = config.to_debate_params();
    if let Some(name) = &cli.model {
        let Ok(model) = name.parse::<Model>();
        return params.with_model(model);
    }
    match cli.tier {
        Some(tier) => params.with_model(LatencyTier::from(tier).model()),
        None => params,
    }
}

fn audit_log(cli: &Cli, config: &FileConfig) -> Arc<dyn AuditLog> {
    let Some(path) = cli.audit_log.clone().or_else(|| config.audit.resolved_path()) else {
        return Arc::new(NoAuditLog);
    };
    match JsonlAuditLog::open(&path) {
        Some(log) => {
            info!("Audit log: {}", log.path().display());
            Arc::new(log)
        }
        None => {
            warn!("Audit logging disabled");
            Arc::new(NoAuditLog)
        }
    }
}

fn print_header(claim: &Claim, policy: &RoundPolicy, model: &Model) {
    println!();
    println!("+============================================================+");
    println!("|           Claim Tribunal - Adversarial Verification        |");
    println!("+============================================================+");
    println!();
    println!("Claim:  {}", claim.content());
    println!("Rounds: {}", policy);
    println!("Model:  {}", model);
    println!();
}
