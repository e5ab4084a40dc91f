//! Typed run configuration, loaded the way the teacher's
//! `server::settings::Settings` layers a JSON file under CLI overrides —
//! except a missing settings file is not fatal here: the simulator must run
//! standalone, with built-in defaults matching the original implementation.
use config::{Config, File};
use serde::Deserialize;

use crate::snowball::adversary::Strategy;

/// Configuration for a Snowball run (§6).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnowballConfig {
    pub num_participants: usize,
    pub adversary_percent: f64,
    pub adversary_strategy: Strategy,
    pub balance: f64,
    pub alpha: f64,
    pub beta: u32,
    pub k: usize,
    pub part_iterations: u64,
    pub net_name: String,
    pub seed: u64,
}

impl Default for SnowballConfig {
    fn default() -> Self {
        SnowballConfig {
            num_participants: 2000,
            adversary_percent: 0.19,
            adversary_strategy: Strategy::IncreaseConfidence,
            balance: 0.5,
            alpha: 0.8,
            beta: 120,
            k: 10,
            part_iterations: 1000,
            net_name: "nn".to_string(),
            seed: 0,
        }
    }
}

impl SnowballConfig {
    pub fn honest_count(&self) -> usize {
        self.num_participants - self.adversary_count()
    }

    pub fn adversary_count(&self) -> usize {
        (self.num_participants as f64 * self.adversary_percent) as usize
    }

    /// Fatal at startup (§7): sampling `k` distinct peers requires at least
    /// `k + 1` participants.
    pub fn validate(&self) -> Result<(), String> {
        if self.k >= self.num_participants {
            return Err(format!(
                "k ({}) must be smaller than num_participants ({})",
                self.k, self.num_participants
            ));
        }
        Ok(())
    }
}

/// Configuration for an Avalanche run (§6).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvalancheConfig {
    pub node_count: usize,
    pub byzantine_percent: f64,
    pub k: usize,
    pub alpha: f64,
    pub beta1: u32,
    pub beta2: u32,
    pub transaction_spawn: f64,
    pub conflict_transaction_spawn: f64,
    pub seed: u64,
}

impl Default for AvalancheConfig {
    fn default() -> Self {
        AvalancheConfig {
            node_count: 100,
            byzantine_percent: 0.0,
            k: 8,
            alpha: 0.6,
            beta1: 10,
            beta2: 10,
            transaction_spawn: 0.001,
            conflict_transaction_spawn: 0.001,
            seed: 0,
        }
    }
}

impl AvalancheConfig {
    /// `success = round(k * alpha)`.
    pub fn success(&self) -> usize {
        (self.k as f64 * self.alpha).round() as usize
    }

    pub fn byzantine_count(&self) -> usize {
        (self.node_count as f64 * self.byzantine_percent).floor() as usize
    }

    pub fn honest_count(&self) -> usize {
        self.node_count - self.byzantine_count()
    }

    /// Peers are sampled from the full participant range (honest and
    /// Byzantine alike, §4.5 step 2), excluding the active node itself.
    pub fn validate(&self) -> Result<(), String> {
        if self.k >= self.node_count {
            return Err(format!(
                "k ({}) must be smaller than node_count ({})",
                self.k, self.node_count
            ));
        }
        Ok(())
    }
}

/// Loads a config layer from an optional JSON file, falling back to
/// `Default::default()` when the file is absent. Any other I/O/parse error
/// is still reported: a malformed settings file is a configuration error.
pub fn load<T>(path: Option<&str>) -> crate::Result<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    match path {
        None => Ok(T::default()),
        Some(path) => {
            let cfg = Config::builder().add_source(File::with_name(path)).build()?;
            Ok(cfg.try_deserialize()?)
        }
    }
}
