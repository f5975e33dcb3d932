use serde::Deserialize;

/// Tunables for the similarity scorer and deduplicator.
#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    /// Minimum combined similarity for two contacts to merge.
    pub threshold: f64,
    /// Weight of name similarity in the combined score.
    pub name_weight: f64,
    /// Weight of address similarity in the combined score.
    pub address_weight: f64,
}

/// Default merge threshold; calibrated against per-parcel fixtures.
pub const DEFAULT_THRESHOLD: f64 = 0.65;
/// Default name weight. Name evidence dominates address evidence.
pub const DEFAULT_NAME_WEIGHT: f64 = 0.6;
/// Default address weight.
pub const DEFAULT_ADDRESS_WEIGHT: f64 = 0.4;

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            name_weight: DEFAULT_NAME_WEIGHT,
            address_weight: DEFAULT_ADDRESS_WEIGHT,
        }
    }
}

impl DedupConfig {
    /// Builds a validated configuration.
    ///
    /// The threshold must lie in [0, 1]; weights must be non-negative and
    /// sum to something positive (they are renormalized over the evidence
    /// actually present, so they need not sum to exactly 1).
    pub fn new(threshold: f64, name_weight: f64, address_weight: f64) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("threshold must be within [0, 1], got {}", threshold);
        }
        if name_weight < 0.0 || address_weight < 0.0 {
            anyhow::bail!(
                "weights must be non-negative, got name={} address={}",
                name_weight,
                address_weight
            );
        }
        if name_weight + address_weight <= 0.0 {
            anyhow::bail!("at least one weight must be positive");
        }
        Ok(Self {
            threshold,
            name_weight,
            address_weight,
        })
    }

    /// Reads the configuration from the environment.
    ///
    /// All variables are optional and fall back to the defaults:
    /// `CONTACT_DEDUP_THRESHOLD`, `CONTACT_DEDUP_NAME_WEIGHT`,
    /// `CONTACT_DEDUP_ADDRESS_WEIGHT`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let threshold = std::env::var("CONTACT_DEDUP_THRESHOLD")
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    anyhow::anyhow!("CONTACT_DEDUP_THRESHOLD must be a number, got '{}'", v)
                })
            })
            .unwrap_or(Ok(DEFAULT_THRESHOLD))?;
        let name_weight = std::env::var("CONTACT_DEDUP_NAME_WEIGHT")
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    anyhow::anyhow!("CONTACT_DEDUP_NAME_WEIGHT must be a number, got '{}'", v)
                })
            })
            .unwrap_or(Ok(DEFAULT_NAME_WEIGHT))?;
        let address_weight = std::env::var("CONTACT_DEDUP_ADDRESS_WEIGHT")
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    anyhow::anyhow!("CONTACT_DEDUP_ADDRESS_WEIGHT must be a number, got '{}'", v)
                })
            })
            .unwrap_or(Ok(DEFAULT_ADDRESS_WEIGHT))?;

        let config = Self::new(threshold, name_weight, address_weight)?;

        tracing::info!("Dedup configuration loaded");
        tracing::debug!(
            "threshold={} name_weight={} address_weight={}",
            config.threshold,
            config.name_weight,
            config.address_weight
        );

        Ok(config)
    }
}
