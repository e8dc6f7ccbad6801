//! Console output formatter for debate results

use colored::{ColoredString, Colorize};
use tribunal_domain::{
    BaselineResult, CitedPoint, ConfigIssue, CrossExamAction, DebateComparison, DebateResult,
    ExamAction, OutputFormat, RoleTurn, Severity, TranscriptEntry, Verdict,
};

/// Formats debate results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a result in the requested format
    pub fn render(result: &DebateResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_full(result),
            OutputFormat::Verdict => Self::format_verdict(result),
            OutputFormat::Json => Self::format_json(result),
        }
    }

    /// Format the complete transcript followed by the verdict
    pub fn format_full(result: &DebateResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Claim Tribunal"));
        output.push('\n');
        output.push_str(&Self::statement(result));

        let mut current_round = 0;
        for entry in result.full_transcript.read_all() {
            if entry.round() != current_round {
                current_round = entry.round();
                output.push_str(&Self::section_header(&format!(
                    "Round {}: {}",
                    current_round,
                    entry.phase()
                )));
            }
            match entry {
                TranscriptEntry::Turn(turn) => output.push_str(&Self::turn(turn)),
                TranscriptEntry::CrossExam(action) => output.push_str(&Self::action(action)),
            }
        }

        output.push_str(&Self::section_header(&format!(
            "Round {}: SYNTHESIS",
            result.rounds_completed + 1
        )));
        output.push_str(&Self::verdict_block(result));
        output.push_str(&Self::footer());

        output
    }

    /// Format the verdict only (concise output)
    pub fn format_verdict(result: &DebateResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Tribunal Verdict ===".cyan().bold()));
        output.push_str(&Self::statement(result));
        output.push_str(&Self::verdict_block(result));

        output
    }

    /// Format as JSON
    pub fn format_json(result: &DebateResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the single-call baseline
    pub fn format_baseline(baseline: &BaselineResult) -> String {
        let mut output = Self::section_header("Single-call baseline");
        output.push_str(&format!(
            "{} {} ({})\n",
            "Verdict:".bold(),
            Self::verdict(baseline.verdict),
            baseline.confidence
        ));
        output.push_str(&format!("{} {}\n", "Reasoning:".bold(), baseline.reasoning));
        if !baseline.key_evidence.is_empty() {
            output.push_str(&format!("{}\n", "Key evidence:".cyan().bold()));
            for quote in &baseline.key_evidence {
                output.push_str(&format!("  * \"{}\"\n", quote));
            }
        }
        output
    }

    /// Format the debate vs. baseline comparison
    pub fn format_comparison(comparison: &DebateComparison) -> String {
        let mut output = Self::section_header("Debate vs. baseline");
        output.push_str(&format!(
            "  {:<10} {} ({})\n",
            "debate",
            Self::verdict(comparison.debate_verdict),
            comparison.debate_confidence
        ));
        output.push_str(&format!(
            "  {:<10} {} ({})\n",
            "baseline",
            Self::verdict(comparison.baseline_verdict),
            comparison.baseline_confidence
        ));

        let agreement = if comparison.verdicts_agree() {
            "verdicts agree".green()
        } else {
            "verdicts differ".yellow().bold()
        };
        output.push_str(&format!(
            "  {}, confidence delta {:+.2}\n",
            agreement,
            comparison.confidence_delta()
        ));
        output
    }

    /// Format configuration issues for stderr
    pub fn format_config_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                let label = if issue.is_error() {
                    "error:".red().bold()
                } else {
                    "warning:".yellow().bold()
                };
                format!("{} {}", label, issue.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn statement(result: &DebateResult) -> String {
        format!(
            "{} {}\n{} {}\n{} {} ({} rounds)\n\n",
            "Claim:".cyan().bold(),
            result.claim.content(),
            "Source:".cyan().bold(),
            result.source_text.content(),
            "Model:".dimmed(),
            result.model,
            result.rounds_completed
        )
    }

    fn verdict_block(result: &DebateResult) -> String {
        let mut output = format!(
            "\n{} {} ({})\n",
            "Verdict:".bold(),
            Self::verdict(result.verdict),
            result.confidence
        );

        if !result.majority_position.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Majority position:".bold(),
                result.majority_position
            ));
        }
        output.push_str(&format!("\n{}\n", result.reasoning));

        if !result.mutation_types.is_empty() {
            let kinds: Vec<String> = result.mutation_types.iter().map(|m| m.to_string()).collect();
            output.push_str(&format!(
                "\n{} {}\n",
                "Mutation types:".magenta().bold(),
                kinds.join(", ")
            ));
        }

        output.push_str(&Self::points("Key agreements:", &result.key_agreements, true));
        output.push_str(&Self::points(
            "Unresolved disputes:",
            &result.unresolved_disputes,
            false,
        ));
        output
    }

    fn points(title: &str, points: &[CitedPoint], agreement: bool) -> String {
        if points.is_empty() {
            return String::new();
        }
        let title = if agreement {
            title.green().bold()
        } else {
            title.yellow().bold()
        };
        let mut output = format!("\n{}\n", title);
        for point in points {
            output.push_str(&format!("  * {}\n", point));
        }
        output
    }

    fn turn(turn: &RoleTurn) -> String {
        let mut output = format!(
            "\n{} {} ({})\n",
            format!("── {} ──", turn.role.display_name()).yellow().bold(),
            Self::verdict(turn.verdict),
            turn.confidence
        );
        for argument in &turn.arguments {
            let severity = argument
                .severity
                .map(|s| format!(" ({})", Self::severity(s)))
                .unwrap_or_default();
            output.push_str(&format!(
                "  [{}]{} {}\n",
                argument.id.as_str().bold(),
                severity,
                argument.text
            ));
            if let Some(quote) = &argument.evidence_quote {
                output.push_str(&format!("        {}\n", format!("\"{}\"", quote).dimmed()));
            }
        }
        output.push_str(&Self::indent(&turn.summary, "  "));
        output.push('\n');
        output
    }

    fn action(action: &CrossExamAction) -> String {
        let verb = match action.action {
            ExamAction::Attack => "ATTACK".red(),
            ExamAction::Concede => "CONCEDE".green(),
            ExamAction::Refine => "REFINE".blue(),
        };
        format!(
            "  {} {} {} [{}]: {}\n",
            action.acting_role.display_name().bold(),
            verb,
            action.target_role.display_name(),
            action.target_argument_id,
            action.response_text
        )
    }

    fn verdict(verdict: Verdict) -> ColoredString {
        let label = verdict.as_str().to_uppercase();
        match verdict {
            Verdict::Faithful => label.green().bold(),
            Verdict::Mutated => label.red().bold(),
            Verdict::Ambiguous => label.yellow().bold(),
        }
    }

    fn severity(severity: Severity) -> ColoredString {
        match severity {
            Severity::High => severity.as_str().red(),
            Severity::Medium => severity.as_str().yellow(),
            Severity::Low => severity.as_str().dimmed(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
