use serde::{Deserialize, Serialize};
use std::fmt;

/// How urgently a flagged construct needs a human look
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(s)
    }
}

/// A construct the converter could not translate with confidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualReviewItem {
    /// Human-readable description of the problem
    pub issue: String,

    pub severity: Severity,

    /// The source text that triggered the item
    #[serde(default, rename = "pattern", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// 1-based line in the component source, when known
    #[serde(default, rename = "source_line", skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// What the developer should do about it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl ManualReviewItem {
    pub fn new(issue: impl Into<String>, severity: Severity) -> Self {
        Self {
            issue: issue.into(),
            severity,
            context: None,
            line: None,
            action: None,
        }
    }

    pub fn low(issue: impl Into<String>) -> Self {
        Self::new(issue, Severity::Low)
    }

    pub fn medium(issue: impl Into<String>) -> Self {
        Self::new(issue, Severity::Medium)
    }

    pub fn high(issue: impl Into<String>) -> Self {
        Self::new(issue, Severity::High)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}
