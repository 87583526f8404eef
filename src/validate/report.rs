//! Validation report and its plain-text rendering.

use serde::Serialize;

use crate::diagnostic::{Issue, Severity};

const PASSED: &str = "VALIDATION PASSED: Workflow is valid.";
const STRUCTURAL_ONLY: &str = "NOTE: node catalog unavailable; only structural checks were run.";
const TRAILER: &str = "Fix ALL errors and provide corrected workflow JSON.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Node × check traversal order.
    pub issues: Vec<Issue>,
    pub node_count: usize,
    /// False when the catalog was empty and only structural rules ran.
    pub checked_against_catalog: bool,
}

impl ValidationReport {
    /// Valid means no error-severity issues; warnings never count.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(Issue::is_error)
    }

    pub fn errors(&self) -> Vec<&Issue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Issue> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    /// Text meant to be fed back to whoever produced the workflow: errors
    /// first with suggestions inline, then warnings, then a request to
    /// resubmit.
    pub fn render_for_agent(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if self.issues.is_empty() {
            lines.push(PASSED.into());
            if !self.checked_against_catalog {
                lines.push(STRUCTURAL_ONLY.into());
            }
            return lines.join("\n");
        }

        let errors = self.errors();
        if !errors.is_empty() {
            lines.push(format!(
                "VALIDATION ERRORS ({} error{}):",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            for (i, issue) in errors.iter().enumerate() {
                let mut line = format!("{}. [{}] {}", i + 1, issue.check, issue.message);
                if let Some(suggestion) = &issue.suggestion {
                    line.push_str(&format!(" - Did you mean '{}'?", suggestion));
                }
                lines.push(line);
            }
        }

        let warnings = self.warnings();
        if !warnings.is_empty() {
            lines.push(format!("\nWARNINGS ({}):", warnings.len()));
            for issue in warnings {
                lines.push(format!("  - [{}] {}", issue.check, issue.message));
            }
        }

        if !self.checked_against_catalog {
            lines.push(format!("\n{}", STRUCTURAL_ONLY));
        }
        lines.push(format!("\n{}", TRAILER));
        lines.join("\n")
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_for_agent())
    }
}
