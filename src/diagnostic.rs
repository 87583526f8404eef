//! Diagnostic record shared by the structural self-check and the validator.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Which rule produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    // Structural, catalog-independent
    EmptyWorkflow,
    MissingClassType,
    MissingInputs,
    LinkValidity,

    // Catalog-driven
    TypeExists,
    RequiredInputs,
    SlotRange,
    TypeCompatibility,
    ValueRange,
    EnumeratedChoice,
}

impl Check {
    pub fn name(&self) -> &'static str {
        match self {
            Check::EmptyWorkflow => "empty-workflow",
            Check::MissingClassType => "missing-class-type",
            Check::MissingInputs => "missing-inputs",
            Check::LinkValidity => "link-validity",
            Check::TypeExists => "type-exists",
            Check::RequiredInputs => "required-inputs",
            Check::SlotRange => "slot-range",
            Check::TypeCompatibility => "type-compatibility",
            Check::ValueRange => "value-range",
            Check::EnumeratedChoice => "enumerated-choice",
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Check::EmptyWorkflow | Check::MissingClassType | Check::MissingInputs | Check::LinkValidity
        )
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub check: Check,
    /// Empty for whole-workflow issues.
    pub node_id: String,
    pub message: String,
    pub severity: Severity,
    /// Known class type the offending one probably meant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.severity, self.check, self.message)?;
        if let Some(s) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", s)?;
        }
        Ok(())
    }
}

impl Issue {
    pub fn error(check: Check, node_id: &str, message: impl Into<String>) -> Self {
        Issue {
            check,
            node_id: node_id.into(),
            message: message.into(),
            severity: Severity::Error,
            suggestion: None,
        }
    }

    pub fn warning(check: Check, node_id: &str, message: impl Into<String>) -> Self {
        Issue {
            check,
            node_id: node_id.into(),
            message: message.into(),
            severity: Severity::Warning,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
