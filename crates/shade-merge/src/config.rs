//! Merge session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shade_archive::TimestampMode;
use shade_transform::{
    AppendingTransformer, PathMatcher, ResourceMergeTransformer, Transformer,
};

use crate::error::MergeResult;

/// Configuration for one merge session, loadable from TOML.
///
/// ```toml
/// deterministic_timestamps = true
///
/// [[merge]]
/// destination = "META-INF/LICENSE"
/// claimed = ["META-INF/LICENSE", "META-INF/LICENSE.txt", "LICENSE"]
/// excluded = []
///
/// [[append]]
/// destination = "META-INF/services/com.example.Plugin"
/// claimed = ["META-INF/services/com.example.Plugin"]
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeConfig {
    /// When `true` (the default), all written entries get a fixed epoch-zero
    /// mtime so rebuilds from identical inputs are byte-identical.
    #[serde(default = "default_deterministic")]
    pub deterministic_timestamps: bool,
    /// Dedup-and-aggregate rules, one merged entry each.
    #[serde(default)]
    pub merge: Vec<ResourceRule>,
    /// Plain concatenation rules, one concatenated entry each.
    #[serde(default)]
    pub append: Vec<ResourceRule>,
}

fn default_deterministic() -> bool {
    true
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            deterministic_timestamps: true,
            merge: Vec::new(),
            append: Vec::new(),
        }
    }
}

/// One transformer rule: the destination entry plus the paths it owns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceRule {
    /// Archive-internal path the aggregated entry is written to.
    pub destination: String,
    /// Paths this rule takes ownership of.
    pub claimed: Vec<String>,
    /// Paths carved out even when also claimed.
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl ResourceRule {
    fn matcher(&self) -> PathMatcher {
        PathMatcher::new()
            .claim_all(self.claimed.iter().cloned())
            .exclude_all(self.excluded.iter().cloned())
    }
}

impl MergeConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(text: &str) -> MergeResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> MergeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The timestamp policy this configuration requests.
    pub fn timestamp_mode(&self) -> TimestampMode {
        if self.deterministic_timestamps {
            TimestampMode::Deterministic
        } else {
            TimestampMode::Wallclock
        }
    }

    /// Instantiate fresh transformers for one merge session.
    pub fn build_transformers(&self) -> Vec<Box<dyn Transformer>> {
        let mut transformers: Vec<Box<dyn Transformer>> = Vec::new();
        for rule in &self.merge {
            transformers.push(Box::new(ResourceMergeTransformer::new(
                rule.destination.clone(),
                rule.matcher(),
            )));
        }
        for rule in &self.append {
            transformers.push(Box::new(AppendingTransformer::new(
                rule.destination.clone(),
                rule.matcher(),
            )));
        }
        transformers
    }
}
