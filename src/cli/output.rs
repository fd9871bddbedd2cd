//! Output formatting for CLI commands
//!
//! Human, JSON and quiet renderings of registry data.

use clap::ValueEnum;
use serde::Serialize;

use crate::registry::audit::{AuditEvent, AuditStats};
use crate::registry::store::ClearCall;
use crate::registry::visibility::{StalenessThresholds, StalenessTier};

/// Output format options
#[derive(Clone, Debug, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
    /// Quiet mode (minimal output)
    Quiet,
}

impl OutputFormat {
    /// Parse the `output_format` value of a config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            "quiet" => Some(OutputFormat::Quiet),
            _ => None,
        }
    }
}

/// Pretty JSON, or `null` if the value cannot be encoded
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Format a list of identifiers or patterns
pub fn format_list(items: &[&str], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human | OutputFormat::Quiet => items.join("\n"),
        OutputFormat::Json => to_json(&items),
    }
}

/// Format an optional pattern list
pub fn format_patterns(patterns: &Option<Vec<&'static str>>, format: &OutputFormat) -> String {
    match patterns {
        Some(patterns) => format_list(patterns, format),
        None => match format {
            OutputFormat::Human => "Not found".to_string(),
            OutputFormat::Json => "null".to_string(),
            OutputFormat::Quiet => "".to_string(),
        },
    }
}

fn describe_call(call: &ClearCall) -> String {
    match call {
        ClearCall::All => "clear all".to_string(),
        ClearCall::Pattern(pattern) => format!("clear {}", pattern),
    }
}

/// Result of dispatching one action from the command line
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub action: String,
    pub dispatched: bool,
    pub clears: Vec<ClearCall>,
}

/// Format the clear calls issued per dispatched action
pub fn format_dispatches(reports: &[DispatchReport], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => reports
            .iter()
            .map(|report| {
                if !report.dispatched {
                    return format!("{}: not dispatched", report.action);
                }
                let mut lines = vec![format!("{} ({} clear calls)", report.action, report.clears.len())];
                lines.extend(report.clears.iter().map(|c| format!("  {}", describe_call(c))));
                lines.join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => to_json(&reports),
        OutputFormat::Quiet => reports
            .iter()
            .map(|report| report.clears.len().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format the audit trail and its summary
pub fn format_audit(events: &[AuditEvent], stats: &AuditStats, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => {
            let mut lines: Vec<String> = events
                .iter()
                .map(|event| {
                    format!(
                        "{:>15}  {:<40} {:>8.3}ms{}",
                        event.timestamp,
                        event.action,
                        event.duration,
                        if event.restored { "  (restored)" } else { "" }
                    )
                })
                .collect();
            lines.push(format!(
                "Audit: {} events, {} restored, avg {:.3}ms",
                stats.total_events, stats.restored_count, stats.average_duration_ms
            ));
            lines.join("\n")
        }
        OutputFormat::Json => to_json(&serde_json::json!({
            "events": events,
            "stats": stats,
        })),
        OutputFormat::Quiet => stats.total_events.to_string(),
    }
}

/// Format a visibility sweep result
pub fn format_sweep(
    elapsed_ms: u64,
    tier: Option<StalenessTier>,
    patterns: &[String],
    format: &OutputFormat,
) -> String {
    match format {
        OutputFormat::Human => {
            let tier = tier.map_or("none", StalenessTier::as_str);
            let mut lines = vec![format!("Hidden {}ms: tier {}", elapsed_ms, tier)];
            lines.extend(patterns.iter().map(|p| format!("  clear {}", p)));
            lines.join("\n")
        }
        OutputFormat::Json => to_json(&serde_json::json!({
            "elapsed_ms": elapsed_ms,
            "tier": tier,
            "cleared": patterns,
        })),
        OutputFormat::Quiet => tier.map_or("none", StalenessTier::as_str).to_string(),
    }
}

/// Format the staleness tier table
pub fn format_tiers(thresholds: &StalenessThresholds, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => StalenessTier::ALL
            .iter()
            .map(|tier| {
                format!(
                    "{} (> {}ms)\n{}",
                    tier,
                    thresholds.threshold(*tier),
                    tier.patterns()
                        .iter()
                        .map(|p| format!("  {}", p))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let tiers: Vec<_> = StalenessTier::ALL
                .iter()
                .map(|tier| {
                    serde_json::json!({
                        "tier": tier,
                        "threshold_ms": thresholds.threshold(*tier),
                        "patterns": tier.patterns(),
                    })
                })
                .collect();
            to_json(&tiers)
        }
        OutputFormat::Quiet => StalenessTier::ALL
            .iter()
            .map(|tier| format!("{}={}", tier, thresholds.threshold(*tier)))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Print output unless quiet mode suppresses it
pub fn print_output(content: &str, format: &OutputFormat, quiet: bool) {
    if quiet && !matches!(format, OutputFormat::Quiet) {
        return;
    }
    if !content.is_empty() {
        println!("{}", content);
    }
}

/// Print error message
pub fn print_error(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("Error: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_patterns_render_per_format() {
        assert_eq!(format_patterns(&None, &OutputFormat::Human), "Not found");
        assert_eq!(format_patterns(&None, &OutputFormat::Json), "null");
        assert_eq!(
            format_patterns(&Some(vec!["/auth/me"]), &OutputFormat::Human),
            "/auth/me"
        );
    }

    #[test]
    fn test_dispatch_report_json_shape() {
        let report = DispatchReport {
            action: "auth:logout".into(),
            dispatched: true,
            clears: vec![ClearCall::All],
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_dispatches(&[report], &OutputFormat::Json)).unwrap();
        assert_eq!(value[0]["clears"][0]["kind"], "all");
    }

    #[test]
    fn test_tiers_quiet_line() {
        let line = format_tiers(&StalenessThresholds::default(), &OutputFormat::Quiet);
        assert_eq!(line, "critical=30000 normal=120000 static=300000");
    }
}
