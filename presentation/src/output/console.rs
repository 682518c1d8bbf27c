//! Console output formatter for ballot notices

use crate::output::formatter::NoticeFormatter;
use ballot_application::BallotStatus;
use ballot_domain::{ConfigIssue, NoticeTemplate, Participant, ParticipantId};
use colored::Colorize;

/// Formats notices and host console output for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a notice, prefixed with who receives it
    pub fn format_notice(recipients: &[ParticipantId], text: &str) -> String {
        let label = match recipients {
            [one] => format!("[→ {}]", one),
            many => format!("[→ all ({})]", many.len()),
        };
        let pad = " ".repeat(label.chars().count() + 1);

        text.lines()
            .enumerate()
            .map(|(i, line)| {
                let prefix = if i == 0 {
                    format!("{} ", label.dimmed())
                } else {
                    pad.clone()
                };
                format!("{}{}", prefix, Self::highlight(line))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Status of every open ballot
    pub fn format_status(statuses: &[BallotStatus]) -> String {
        if statuses.is_empty() {
            return NoticeTemplate::no_active_votes().to_string();
        }

        statuses
            .iter()
            .map(|s| {
                let report = NoticeTemplate::status_report(
                    &s.payload,
                    &s.tally(),
                    s.seconds_remaining,
                );
                let body = report
                    .lines()
                    .map(Self::highlight)
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}\n{} {}", body, "Initiator:".cyan(), s.initiator)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format as JSON
    pub fn format_status_json(statuses: &[BallotStatus]) -> String {
        serde_json::to_string_pretty(statuses).unwrap_or_else(|_| "[]".to_string())
    }

    /// Configuration issues, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                if issue.is_error() {
                    issue.to_string().red().to_string()
                } else {
                    issue.to_string().yellow().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Online participants for `/who`
    pub fn format_members(members: &[(Participant, bool)]) -> String {
        if members.is_empty() {
            return "Nobody is online.".dimmed().to_string();
        }

        let mut output = format!("{} ({})\n", "Online:".cyan().bold(), members.len());
        for (participant, privileged) in members {
            output.push_str(&format!("  - {}", participant.display_name()));
            if *privileged {
                output.push_str(&format!(" {}", "(op)".yellow()));
            }
            output.push('\n');
        }
        output.trim_end().to_string()
    }

    /// Policy values for `/set` without arguments
    pub fn format_policy(entries: &[(&str, String)]) -> String {
        entries
            .iter()
            .map(|(key, value)| format!("  {} = {}", key.cyan(), value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Colour a notice line by its marker
    fn highlight(line: &str) -> String {
        if line.starts_with("===") {
            line.yellow().bold().to_string()
        } else if line.starts_with('✓') {
            line.green().bold().to_string()
        } else if line.starts_with('✗') {
            line.red().bold().to_string()
        } else {
            line.to_string()
        }
    }
}

impl NoticeFormatter for ConsoleFormatter {
    fn format_notice(&self, recipients: &[ParticipantId], text: &str) -> String {
        Self::format_notice(recipients, text)
    }

    fn format_status(&self, statuses: &[BallotStatus]) -> String {
        Self::format_status(statuses)
    }

    fn format_status_json(&self, statuses: &[BallotStatus]) -> String {
        Self::format_status_json(statuses)
    }
}
