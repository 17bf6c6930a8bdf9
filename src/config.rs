//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a running [`OrderSystem`](crate::lifecycle::OrderSystem).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Mailbox capacity for every actor channel.
    pub channel_capacity: usize,
    /// Threshold applied to products created without an explicit one.
    pub default_low_stock_threshold: u32,
    /// Cancel/return/exchange reasons are trimmed and capped at this length.
    pub max_reason_len: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            default_low_stock_threshold: 5,
            max_reason_len: 500,
        }
    }
}

/// The slice of configuration the inventory (product) actor runs with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub default_low_stock_threshold: u32,
}

impl MarketConfig {
    pub fn inventory(&self) -> InventoryConfig {
        InventoryConfig {
            default_low_stock_threshold: self.default_low_stock_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = MarketConfig::default();
        assert_eq!(config.default_low_stock_threshold, 5);
        assert_eq!(config.max_reason_len, 500);
        assert!(config.channel_capacity > 0);
    }
}
