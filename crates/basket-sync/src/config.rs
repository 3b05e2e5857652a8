//! # Façade Configuration
//!
//! Configuration for the cart façade: where the local blob lives and which
//! pricing rules the totals are derived under.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Explicit path passed to FacadeConfig::load_from                     │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/basket/basket.toml (Linux)                                │
//! │     ~/Library/Application Support/com.basket.basket/basket.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     platform data dir, key "basket.cart", 8% tax, $15 shipping,         │
//! │     free shipping at $600                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # basket.toml
//! [storage]
//! dir = "/var/lib/basket"
//! key = "basket.cart"
//!
//! [pricing]
//! tax_rate_bps = 800
//! flat_shipping_cents = 1500
//! free_shipping_threshold_cents = 60000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use basket_core::money::{Money, TaxRate};
use basket_core::totals::PricingRules;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Sections
// =============================================================================

/// Where the local cart blob is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for the file backend. `None` = platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Storage key the blob lives under.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    "basket.cart".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            dir: None,
            key: default_storage_key(),
        }
    }
}

/// Pricing rules in their on-disk integer form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tax rate in basis points (800 = 8%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Flat shipping fee in cents.
    #[serde(default = "default_flat_shipping_cents")]
    pub flat_shipping_cents: i64,

    /// Free-shipping threshold in cents.
    #[serde(default = "default_free_shipping_threshold_cents")]
    pub free_shipping_threshold_cents: i64,
}

fn default_tax_rate_bps() -> u32 {
    800
}
fn default_flat_shipping_cents() -> i64 {
    1500
}
fn default_free_shipping_threshold_cents() -> i64 {
    60_000
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate_bps: default_tax_rate_bps(),
            flat_shipping_cents: default_flat_shipping_cents(),
            free_shipping_threshold_cents: default_free_shipping_threshold_cents(),
        }
    }
}

// =============================================================================
// Façade Configuration
// =============================================================================

/// Top-level configuration for the cart façade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Local blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pricing rules for totals derivation.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl FacadeConfig {
    /// Loads configuration from the platform config directory, falling
    /// back to defaults when the file does not exist.
    pub fn load() -> SyncResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(FacadeConfig::default())
            }
        }
    }

    /// Loads configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| SyncError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config = toml::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded façade config");
        Ok(config)
    }

    /// Platform-correct default config file path.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "basket", "basket")
            .map(|dirs| dirs.config_dir().join("basket.toml"))
    }

    /// Platform-correct default storage directory for the file backend.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone().or_else(|| {
            ProjectDirs::from("com", "basket", "basket")
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }

    /// Converts the pricing section into the calculator's rules.
    pub fn pricing_rules(&self) -> PricingRules {
        PricingRules {
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps),
            flat_shipping: Money::from_cents(self.pricing.flat_shipping_cents),
            free_shipping_threshold: Money::from_cents(self.pricing.free_shipping_threshold_cents),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_storefront_rules() {
        let config = FacadeConfig::default();
        let rules = config.pricing_rules();

        assert_eq!(rules.tax_rate.bps(), 800);
        assert_eq!(rules.flat_shipping.cents(), 1500);
        assert_eq!(rules.free_shipping_threshold.cents(), 60_000);
        assert_eq!(config.storage.key, "basket.cart");
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basket.toml");
        fs::write(
            &path,
            r#"
[storage]
key = "shop.cart"

[pricing]
tax_rate_bps = 825
flat_shipping_cents = 999
"#,
        )
        .unwrap();

        let config = FacadeConfig::load_from(&path).unwrap();
        assert_eq!(config.storage.key, "shop.cart");
        assert_eq!(config.pricing.tax_rate_bps, 825);
        assert_eq!(config.pricing.flat_shipping_cents, 999);
        // Unspecified field falls back to its default
        assert_eq!(config.pricing.free_shipping_threshold_cents, 60_000);
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basket.toml");
        fs::write(&path, "[pricing\ntax_rate_bps = ").unwrap();

        let err = FacadeConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }
}
