use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement strategies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Left to right, then wrap to a new row. Tiles keep input (reading) order.
    #[default]
    Sequential,
    /// Drop each tile onto the globally lowest admissible span. Tighter, but only
    /// coincidentally ordered within a row.
    Random,
}

impl Strategy {
    /// Maps the "preserve order" switch onto a strategy.
    pub fn from_preserve_order(preserve_order: bool) -> Self {
        if preserve_order {
            Self::Sequential
        } else {
            Self::Random
        }
    }

    pub fn preserves_order(&self) -> bool {
        matches!(self, Self::Sequential)
    }
}

impl FromStr for Strategy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "ordered" => Ok(Self::Sequential),
            "random" | "lowest" => Ok(Self::Random),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Random => f.write_str("random"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for PackerConfig {
    fn default() -> Self {
        // A4 at 300 dpi.
        Self {
            page_width: 2480,
            page_height: 3508,
            strategy: Strategy::default(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if either page dimension is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackError;

        if self.page_width == 0 || self.page_height == 0 {
            return Err(PackError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }
        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_page_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn strategy(mut self, v: Strategy) -> Self {
        self.cfg.strategy = v;
        self
    }
    pub fn preserve_order(mut self, v: bool) -> Self {
        self.cfg.strategy = Strategy::from_preserve_order(v);
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
