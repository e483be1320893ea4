use serde::Serialize;

use crate::config::CheckKind;
use crate::error::Result;

use super::{CheckReport, CheckStatus, OutputFormatter, Summary};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: Summary,
    checks: Vec<JsonCheck<'a>>,
}

#[derive(Serialize)]
struct JsonCheck<'a> {
    name: &'a str,
    kind: CheckKind,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, reports: &[CheckReport]) -> Result<String> {
        let output = JsonOutput {
            summary: Summary::of(reports),
            checks: reports
                .iter()
                .map(|r| JsonCheck {
                    name: &r.name,
                    kind: r.kind,
                    status: r.status,
                    detail: r.detail.as_deref(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
