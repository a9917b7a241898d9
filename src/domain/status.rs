//! Status variants and their badge styles.
//!
//! Every mapping here is an exhaustive `match`: adding a variant fails to
//! compile until each style table handles it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default prefix for CSS custom properties.
pub const DEFAULT_VAR_PREFIX: &str = "aeg";

/// Standing of a member in the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationStatus {
    Active,
    #[serde(alias = "on-hold", alias = "on_hold")]
    Hold,
    Warning,
}

/// Semantic color family shared by all status badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Success,
    Info,
    Warning,
    Neutral,
    Danger,
}

impl StatusTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTone::Success => "success",
            StatusTone::Info => "info",
            StatusTone::Warning => "warning",
            StatusTone::Neutral => "neutral",
            StatusTone::Danger => "danger",
        }
    }

    /// CSS reference for the tone's background, e.g. `var(--aeg-status-success-background)`.
    pub fn background_var(&self, prefix: &str) -> String {
        format!("var(--{}-status-{}-background)", prefix, self.as_str())
    }

    /// CSS reference for the tone's foreground.
    pub fn foreground_var(&self, prefix: &str) -> String {
        format!("var(--{}-status-{}-foreground)", prefix, self.as_str())
    }
}

impl fmt::Display for StatusTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved badge colors for one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusStyle {
    pub tone: StatusTone,
    pub background: String,
    pub foreground: String,
}

impl OrganizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationStatus::Active => "active",
            OrganizationStatus::Hold => "hold",
            OrganizationStatus::Warning => "warning",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            OrganizationStatus::Active => StatusTone::Success,
            OrganizationStatus::Hold => StatusTone::Warning,
            OrganizationStatus::Warning => StatusTone::Danger,
        }
    }

    /// Badge label shown on organization cards.
    pub fn label(&self) -> &'static str {
        match self {
            OrganizationStatus::Active => "활성",
            OrganizationStatus::Hold => "보류",
            OrganizationStatus::Warning => "경고",
        }
    }

    pub fn style(&self, prefix: &str) -> StatusStyle {
        let tone = self.tone();
        StatusStyle {
            tone,
            background: tone.background_var(prefix),
            foreground: tone.foreground_var(prefix),
        }
    }
}

impl fmt::Display for OrganizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
