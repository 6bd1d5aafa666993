use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posdash_core::DomainError;

/// Stable alert identifier: `<rule id>` or `<rule id>:<subject>`.
///
/// Derived from the rule and what it is about (never random), so re-evaluating
/// an unchanged snapshot reproduces the same ids and dismissals stick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn rule(rule: &str) -> Self {
        Self(rule.to_string())
    }

    pub fn subject(rule: &str, subject: impl core::fmt::Display) -> Self {
        Self(format!("{rule}:{subject}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The rule part of the id (everything before the first `:`).
    pub fn rule_id(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }
}

impl core::fmt::Display for AlertId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Success,
    Opportunity,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::Warning,
        Severity::Info,
        Severity::Success,
        Severity::Opportunity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Opportunity => "opportunity",
        }
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| DomainError::unknown("severity", s))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Inventory,
    Sales,
    Customer,
    Operations,
    Financial,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Inventory,
        Category::Sales,
        Category::Customer,
        Category::Operations,
        Category::Financial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Inventory => "inventory",
            Category::Sales => "sales",
            Category::Customer => "customer",
            Category::Operations => "operations",
            Category::Financial => "financial",
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|cat| cat.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| DomainError::unknown("category", s))
    }
}

/// Suggested follow-up: a label and the dashboard view it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertAction {
    pub label: String,
    pub target: String,
}

impl AlertAction {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub severity: Severity,
    pub category: Category,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AlertAction>,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        id: AlertId,
        severity: Severity,
        category: Category,
        title: impl Into<String>,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            severity,
            category,
            title: title.into(),
            message: message.into(),
            action: None,
            raised_at,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, target: impl Into<String>) -> Self {
        self.action = Some(AlertAction::new(label, target));
        self
    }

    /// Equal in everything but `raised_at`.
    pub fn equivalent(&self, other: &Alert) -> bool {
        self.id == other.id
            && self.severity == other.severity
            && self.category == other.category
            && self.title == other.title
            && self.message == other.message
            && self.action == other.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_ids_keep_the_rule_prefix() {
        let id = AlertId::subject("inventory.low_stock", "abc");
        assert_eq!(id.as_str(), "inventory.low_stock:abc");
        assert_eq!(id.rule_id(), "inventory.low_stock");
        assert_eq!(AlertId::rule("sales.growth").rule_id(), "sales.growth");
    }

    #[test]
    fn severity_and_category_parse() {
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("financial".parse::<Category>().unwrap(), Category::Financial);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn serialized_shape() {
        let raised = chrono::TimeZone::with_ymd_and_hms(&Utc, 2026, 1, 1, 0, 0, 0).unwrap();
        let alert = Alert::new(
            AlertId::rule("financial.high_refund_rate"),
            Severity::Critical,
            Category::Financial,
            "High refund rate",
            "12.0% of sales refunded",
            raised,
        );
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["id"], "financial.high_refund_rate");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["category"], "financial");
        assert!(json.get("action").is_none());
    }
}
