//! Staleness tiers and their thresholds

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::error::{RegistryError, RegistryResult};

/// How stale cached data is considered after the page was hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StalenessTier {
    /// Balances and live status
    Critical,
    /// Collections, inventories, progress
    Normal,
    /// Reference data that rarely changes
    Static,
}

impl StalenessTier {
    /// Ascending order
    pub const ALL: [StalenessTier; 3] = [
        StalenessTier::Critical,
        StalenessTier::Normal,
        StalenessTier::Static,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StalenessTier::Critical => "critical",
            StalenessTier::Normal => "normal",
            StalenessTier::Static => "static",
        }
    }

    /// Patterns cleared when this tier is reached
    pub const fn patterns(self) -> &'static [&'static str] {
        match self {
            StalenessTier::Critical => &[
                "/auth/me",
                "/dojo/status",
                "/essence-tap/status",
                "/fishing/info",
            ],
            StalenessTier::Normal => &[
                "/characters/collection",
                "/gacha/pity",
                "/fishing/inventory",
                "/fishing/challenges",
                "/banners/user/tickets",
                "/fortune-wheel/status",
            ],
            StalenessTier::Static => &[
                "/banners",
                "/characters",
                "/rarities",
                "/fishing/areas",
                "/announcements/active",
            ],
        }
    }

    /// This tier and every lower tier, lowest first
    pub fn cumulative(self) -> &'static [StalenessTier] {
        match self {
            StalenessTier::Critical => &[StalenessTier::Critical],
            StalenessTier::Normal => &[StalenessTier::Critical, StalenessTier::Normal],
            StalenessTier::Static => &Self::ALL,
        }
    }
}

impl fmt::Display for StalenessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StalenessTier {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| {
                RegistryError::invalid_configuration(format!("unknown staleness tier '{}'", s))
            })
    }
}

/// Hidden-time thresholds in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StalenessThresholds {
    pub critical_ms: u64,
    pub normal_ms: u64,
    pub static_ms: u64,
}

impl Default for StalenessThresholds {
    fn default() -> Self {
        Self {
            critical_ms: 30_000,
            normal_ms: 120_000,
            static_ms: 300_000,
        }
    }
}

impl StalenessThresholds {
    pub fn threshold(&self, tier: StalenessTier) -> u64 {
        match tier {
            StalenessTier::Critical => self.critical_ms,
            StalenessTier::Normal => self.normal_ms,
            StalenessTier::Static => self.static_ms,
        }
    }

    /// Highest tier whose threshold `elapsed_ms` strictly exceeds
    pub fn classify(&self, elapsed_ms: u64) -> Option<StalenessTier> {
        StalenessTier::ALL
            .into_iter()
            .rev()
            .find(|tier| elapsed_ms > self.threshold(*tier))
    }

    /// Thresholds must be strictly ascending from critical to static
    pub fn validate(&self) -> RegistryResult<()> {
        if self.critical_ms < self.normal_ms && self.normal_ms < self.static_ms {
            Ok(())
        } else {
            Err(RegistryError::invalid_configuration(format!(
                "staleness thresholds must ascend (critical {} < normal {} < static {})",
                self.critical_ms, self.normal_ms, self.static_ms
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let t = StalenessThresholds::default();
        assert_eq!(t.classify(5_000), None);
        assert_eq!(t.classify(30_000), None);
        assert_eq!(t.classify(30_001), Some(StalenessTier::Critical));
        assert_eq!(t.classify(150_000), Some(StalenessTier::Normal));
        assert_eq!(t.classify(300_000), Some(StalenessTier::Normal));
        assert_eq!(t.classify(300_001), Some(StalenessTier::Static));
    }

    #[test]
    fn test_cumulative_tiers() {
        assert_eq!(
            StalenessTier::Normal.cumulative(),
            &[StalenessTier::Critical, StalenessTier::Normal]
        );
        assert_eq!(StalenessTier::Static.cumulative().len(), 3);
        assert_eq!(StalenessTier::Critical.cumulative(), &[StalenessTier::Critical]);
    }

    #[test]
    fn test_validate_rejects_unordered() {
        assert!(StalenessThresholds::default().validate().is_ok());
        let bad = StalenessThresholds {
            critical_ms: 60_000,
            normal_ms: 60_000,
            static_ms: 300_000,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_tier_parse_and_serde() {
        assert_eq!("static".parse::<StalenessTier>(), Ok(StalenessTier::Static));
        assert!("stale".parse::<StalenessTier>().is_err());
        assert_eq!(
            serde_json::to_string(&StalenessTier::Normal).unwrap(),
            "\"normal\""
        );
    }
}
