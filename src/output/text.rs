use std::fmt::Write;

use crate::error::Result;

use super::{CheckReport, CheckStatus, OutputFormatter, Summary};

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    Always,
    Never,
}

mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RESET: &str = "\x1b[0m";
}

pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
        }
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    const fn status_icon(status: CheckStatus) -> &'static str {
        match status {
            CheckStatus::Passed => "✓",
            CheckStatus::Promoted => "+",
            CheckStatus::Skipped => "○",
            CheckStatus::Failed => "✗",
        }
    }

    const fn status_color(status: CheckStatus) -> &'static str {
        match status {
            CheckStatus::Passed => ansi::GREEN,
            CheckStatus::Promoted => ansi::CYAN,
            CheckStatus::Skipped => ansi::YELLOW,
            CheckStatus::Failed => ansi::RED,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    fn format_report(&self, report: &CheckReport, output: &mut String) {
        let status = self.colorize(report.status.label(), Self::status_color(report.status));
        writeln!(
            output,
            "{} {status}: {} ({})",
            Self::status_icon(report.status),
            report.name,
            report.kind
        )
        .ok();
        if let Some(detail) = &report.detail {
            for line in detail.lines() {
                writeln!(output, "   {line}").ok();
            }
        }
    }

    fn format_summary(&self, summary: Summary) -> String {
        let failed = self.colorize(&summary.failed.to_string(), ansi::RED);
        format!(
            "{} passed, {} promoted, {} skipped, {failed} failed",
            summary.passed, summary.promoted, summary.skipped
        )
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, reports: &[CheckReport]) -> Result<String> {
        let mut output = String::new();
        for report in reports {
            self.format_report(report, &mut output);
        }
        if !reports.is_empty() {
            output.push('\n');
        }
        output.push_str(&self.format_summary(Summary::of(reports)));
        output.push('\n');
        Ok(output)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
