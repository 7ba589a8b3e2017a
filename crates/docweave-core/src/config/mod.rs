//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::graph::CanvasBounds;
use crate::domain::synthesis::ContradictionRule;

/// Upper bound on insight nodes in a built graph
pub const MAX_INSIGHT_NODES: usize = 3;

/// Docweave configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub synthesis: SynthesisConfig,
    pub graph: GraphConfig,
    pub canvas: CanvasConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Fixed RNG seed; when unset the seed is derived from document content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Lowest confidence a synthesized insight may carry
    pub min_confidence: u8,
    /// How many absent categories may be proposed as research gaps
    pub max_absent_category_gaps: usize,
    /// Category catalog used when proposing gaps
    pub expected_categories: Vec<String>,
    /// Category pairs that are likely to conflict
    pub contradiction_rules: Vec<ContradictionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub grid_columns: usize,
    pub grid_origin_x: f64,
    pub grid_origin_y: f64,
    pub grid_spacing_x: f64,
    pub grid_spacing_y: f64,
    /// Minimum Jaccard similarity of referencing documents for a concept chain edge
    pub concept_link_threshold: f64,
    /// At most [`MAX_INSIGHT_NODES`]
    pub max_insight_nodes: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            synthesis: SynthesisConfig::default(),
            graph: GraphConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_confidence: 60,
            max_absent_category_gaps: 2,
            expected_categories: [
                "Finance",
                "Strategy",
                "Marketing",
                "Operations",
                "Legal",
                "Technology",
                "Research",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            contradiction_rules: ContradictionRule::defaults(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            grid_columns: 4,
            grid_origin_x: 80.0,
            grid_origin_y: 80.0,
            grid_spacing_x: 140.0,
            grid_spacing_y: 110.0,
            concept_link_threshold: 0.4,
            max_insight_nodes: MAX_INSIGHT_NODES,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 20.0,
        }
    }
}

impl CanvasConfig {
    /// Drag-clamping bounds for this canvas
    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds::new(self.width, self.height).with_margin(self.margin)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DOCWEAVE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("docweave")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if no file exists
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        Self::default().save()
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(60..=100).contains(&self.synthesis.min_confidence) {
            return Err(anyhow!("synthesis.min_confidence must be between 60 and 100"));
        }
        if self.synthesis.max_absent_category_gaps > 2 {
            return Err(anyhow!("synthesis.max_absent_category_gaps must be at most 2"));
        }
        if self.graph.grid_columns == 0 {
            return Err(anyhow!("graph.grid_columns must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.graph.concept_link_threshold) {
            return Err(anyhow!("graph.concept_link_threshold must be between 0.0 and 1.0"));
        }
        if self.graph.max_insight_nodes > MAX_INSIGHT_NODES {
            return Err(anyhow!("graph.max_insight_nodes must be at most {}", MAX_INSIGHT_NODES));
        }
        let canvas = &self.canvas;
        if canvas.margin < 0.0
            || canvas.width <= canvas.margin * 2.0
            || canvas.height <= canvas.margin * 2.0
        {
            return Err(anyhow!(
                "canvas must be larger than twice its margin ({}x{} with margin {})",
                canvas.width,
                canvas.height,
                canvas.margin
            ));
        }
        Ok(())
    }

    /// All keys accepted by `get` and `set`
    pub fn keys() -> &'static [&'static str] {
        &[
            "synthesis.seed",
            "synthesis.min_confidence",
            "synthesis.max_absent_category_gaps",
            "synthesis.expected_categories",
            "graph.grid_columns",
            "graph.grid_origin_x",
            "graph.grid_origin_y",
            "graph.grid_spacing_x",
            "graph.grid_spacing_y",
            "graph.concept_link_threshold",
            "graph.max_insight_nodes",
            "canvas.width",
            "canvas.height",
            "canvas.margin",
        ]
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "synthesis.seed" => Ok(self
                .synthesis
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(derived from document content)".to_string())),
            "synthesis.min_confidence" => Ok(self.synthesis.min_confidence.to_string()),
            "synthesis.max_absent_category_gaps" => {
                Ok(self.synthesis.max_absent_category_gaps.to_string())
            }
            "synthesis.expected_categories" => Ok(self.synthesis.expected_categories.join(", ")),

            "graph.grid_columns" => Ok(self.graph.grid_columns.to_string()),
            "graph.grid_origin_x" => Ok(self.graph.grid_origin_x.to_string()),
            "graph.grid_origin_y" => Ok(self.graph.grid_origin_y.to_string()),
            "graph.grid_spacing_x" => Ok(self.graph.grid_spacing_x.to_string()),
            "graph.grid_spacing_y" => Ok(self.graph.grid_spacing_y.to_string()),
            "graph.concept_link_threshold" => Ok(self.graph.concept_link_threshold.to_string()),
            "graph.max_insight_nodes" => Ok(self.graph.max_insight_nodes.to_string()),

            "canvas.width" => Ok(self.canvas.width.to_string()),
            "canvas.height" => Ok(self.canvas.height.to_string()),
            "canvas.margin" => Ok(self.canvas.margin.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `docweave config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "synthesis.seed" => {
                self.synthesis.seed = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid seed value: {}", value))?,
                    )
                };
            }
            "synthesis.min_confidence" => {
                let floor: u8 = value
                    .parse()
                    .with_context(|| format!("Invalid min_confidence value: {}", value))?;
                if !(60..=100).contains(&floor) {
                    return Err(anyhow!("min_confidence must be between 60 and 100"));
                }
                self.synthesis.min_confidence = floor;
            }
            "synthesis.max_absent_category_gaps" => {
                let max: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_absent_category_gaps value: {}", value))?;
                if max > 2 {
                    return Err(anyhow!("max_absent_category_gaps must be at most 2"));
                }
                self.synthesis.max_absent_category_gaps = max;
            }
            "synthesis.expected_categories" => {
                self.synthesis.expected_categories = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }

            "graph.grid_columns" => {
                let columns: usize = value
                    .parse()
                    .with_context(|| format!("Invalid grid_columns value: {}", value))?;
                if columns == 0 {
                    return Err(anyhow!("grid_columns must be at least 1"));
                }
                self.graph.grid_columns = columns;
            }
            "graph.grid_origin_x" => self.graph.grid_origin_x = parse_f64(key, value)?,
            "graph.grid_origin_y" => self.graph.grid_origin_y = parse_f64(key, value)?,
            "graph.grid_spacing_x" => self.graph.grid_spacing_x = parse_f64(key, value)?,
            "graph.grid_spacing_y" => self.graph.grid_spacing_y = parse_f64(key, value)?,
            "graph.concept_link_threshold" => {
                let threshold = parse_f64(key, value)?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(anyhow!("concept_link_threshold must be between 0.0 and 1.0"));
                }
                self.graph.concept_link_threshold = threshold;
            }
            "graph.max_insight_nodes" => {
                let max: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_insight_nodes value: {}", value))?;
                if max > MAX_INSIGHT_NODES {
                    return Err(anyhow!("max_insight_nodes must be at most {}", MAX_INSIGHT_NODES));
                }
                self.graph.max_insight_nodes = max;
            }

            "canvas.width" => self.canvas.width = parse_f64(key, value)?,
            "canvas.height" => self.canvas.height = parse_f64(key, value)?,
            "canvas.margin" => self.canvas.margin = parse_f64(key, value)?,

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `docweave config list` to see available keys.",
                    key
                ));
            }
        }
        self.validate()
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        Self::keys()
            .iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }
}

fn parse_f64(key: &str, value: &str) -> anyhow::Result<f64> {
    value
        .parse()
        .with_context(|| format!("Invalid value for {}: {}", key, value))
}
