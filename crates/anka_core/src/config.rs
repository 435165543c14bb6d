//! Page session configuration.
//!
//! # Responsibility
//! - Describe which page, host and viewer a session is bound to.
//! - Resolve configuration from environment variables for CLI/FFI hosts.
//!
//! # Invariants
//! - A validated config never carries empty or untrimmed ids.

use crate::matcher::rule::{parse_match_rule, MatchRuleError, MatchRuleKind};
use crate::model::message::{PageId, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable overriding the page id.
pub const ENV_PAGE_ID: &str = "ANKA_PAGE_ID";
/// Environment variable naming the host participant (required).
pub const ENV_HOST_ID: &str = "ANKA_HOST_ID";
/// Environment variable overriding the viewing participant.
pub const ENV_VIEWER_ID: &str = "ANKA_VIEWER_ID";
/// Environment variable selecting the match rule (`overlap|coverage`).
pub const ENV_MATCH_RULE: &str = "ANKA_MATCH_RULE";

pub const DEFAULT_PAGE_ID: &str = "1";
pub const DEFAULT_VIEWER_ID: &str = "user01";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyField(&'static str),
    MissingEnv(&'static str),
    UnsupportedMatchRule(MatchRuleError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "config field `{field}` must not be empty"),
            Self::MissingEnv(name) => write!(f, "environment variable `{name}` is required"),
            Self::UnsupportedMatchRule(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedMatchRule(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatchRuleError> for ConfigError {
    fn from(value: MatchRuleError) -> Self {
        Self::UnsupportedMatchRule(value)
    }
}

/// Session binding for one anka page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub page_id: PageId,
    pub host_id: UserId,
    pub viewer_id: UserId,
    pub match_rule: MatchRuleKind,
}

impl SessionConfig {
    /// Creates a config with the default (`overlap`) match rule.
    pub fn new(
        page_id: impl Into<PageId>,
        host_id: impl Into<UserId>,
        viewer_id: impl Into<UserId>,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            host_id: host_id.into(),
            viewer_id: viewer_id.into(),
            match_rule: MatchRuleKind::default(),
        }
    }

    pub fn with_match_rule(mut self, match_rule: MatchRuleKind) -> Self {
        self.match_rule = match_rule;
        self
    }

    /// Resolves configuration from `ANKA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host_id = non_blank(ENV_HOST_ID).ok_or(ConfigError::MissingEnv(ENV_HOST_ID))?;
        let page_id = non_blank(ENV_PAGE_ID).unwrap_or_else(|| DEFAULT_PAGE_ID.to_string());
        let viewer_id =
            non_blank(ENV_VIEWER_ID).unwrap_or_else(|| DEFAULT_VIEWER_ID.to_string());
        let match_rule = match non_blank(ENV_MATCH_RULE) {
            Some(raw) => parse_match_rule(&raw)?,
            None => MatchRuleKind::default(),
        };

        Self {
            page_id,
            host_id,
            viewer_id,
            match_rule,
        }
        .validate()
    }

    /// Trims ids and rejects empty ones.
    pub fn validate(self) -> Result<Self, ConfigError> {
        Ok(Self {
            page_id: required("page_id", &self.page_id)?,
            host_id: required("host_id", &self.host_id)?,
            viewer_id: required("viewer_id", &self.viewer_id)?,
            match_rule: self.match_rule,
        })
    }

    pub fn viewer_is_host(&self) -> bool {
        self.viewer_id == self.host_id
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
