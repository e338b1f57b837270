// src/config.rs
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::errors::DedupeError;

pub const DEFAULT_PHONE_SUFFIX_MIN_DIGITS: usize = 1;

/// How duplicate pairs are turned into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Later records are compared against the group's seed only.
    #[default]
    Star,
    /// Connected components over every duplicate pair.
    Transitive,
}

impl GroupingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingStrategy::Star => "star",
            GroupingStrategy::Transitive => "transitive",
        }
    }
}

impl FromStr for GroupingStrategy {
    type Err = DedupeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "star" => Ok(GroupingStrategy::Star),
            "transitive" => Ok(GroupingStrategy::Transitive),
            other => Err(DedupeError::InvalidConfig {
                key: "DEDUPE_GROUPING_STRATEGY".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    /// Allow phones to match when one is a suffix of the other.
    pub phone_suffix_match: bool,
    /// Minimum significant digits on both sides for a suffix match.
    pub phone_suffix_min_digits: usize,
    /// Legacy name+company rule.
    pub name_company_rule: bool,
    pub grouping_strategy: GroupingStrategy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            phone_suffix_match: true,
            phone_suffix_min_digits: DEFAULT_PHONE_SUFFIX_MIN_DIGITS,
            name_company_rule: true,
            grouping_strategy: GroupingStrategy::Star,
        }
    }
}

impl MatchingConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let phone_suffix_match = env::var("DEDUPE_PHONE_SUFFIX_MATCH")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let phone_suffix_min_digits = env::var("DEDUPE_PHONE_SUFFIX_MIN_DIGITS")
            .unwrap_or_else(|_| DEFAULT_PHONE_SUFFIX_MIN_DIGITS.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_PHONE_SUFFIX_MIN_DIGITS)
            .max(1);

        let name_company_rule = env::var("DEDUPE_NAME_COMPANY_RULE")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        let grouping_strategy = match env::var("DEDUPE_GROUPING_STRATEGY") {
            Ok(raw) => raw.parse::<GroupingStrategy>().unwrap_or_else(|e| {
                warn!("{}. Falling back to star grouping.", e);
                GroupingStrategy::Star
            }),
            Err(_) => GroupingStrategy::Star,
        };

        let config = Self {
            phone_suffix_match,
            phone_suffix_min_digits,
            name_company_rule,
            grouping_strategy,
        };
        debug!("Matching config: {:?}", config);
        config
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("🔧 Duplicate matching configuration");
        if self.phone_suffix_match {
            info!(
                "   Phone suffix matching ENABLED (min {} significant digits)",
                self.phone_suffix_min_digits
            );
        } else {
            info!("   Phone suffix matching DISABLED - exact phone equality only");
        }
        info!(
            "   Name+company rule: {}",
            if self.name_company_rule { "enabled" } else { "disabled" }
        );
        info!("   Grouping strategy: {}", self.grouping_strategy.as_str());
    }
}
