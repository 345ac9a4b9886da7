use serde::{Deserialize, Serialize};

/// Configuration for line-window chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Window size in lines
    pub max_lines: usize,

    /// Lines shared between consecutive windows of the same file
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_lines: 120,
            overlap: 20,
        }
    }
}

impl ChunkerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_lines == 0 {
            return Err("max_lines must be > 0".to_string());
        }

        if self.overlap >= self.max_lines {
            return Err(format!(
                "overlap ({}) must be smaller than max_lines ({})",
                self.overlap, self.max_lines
            ));
        }

        Ok(())
    }

    /// Distance the window start moves between consecutive chunks
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.max_lines - self.overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ChunkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stride(), 100);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChunkerConfig {
            max_lines: 0,
            overlap: 0,
        };
        assert!(config.validate().is_err());

        // Invalid: overlap == max_lines would never advance
        config.max_lines = 4;
        config.overlap = 4;
        assert!(config.validate().is_err());

        config.overlap = 9;
        assert!(config.validate().is_err());

        config.overlap = 3;
        assert!(config.validate().is_ok());

        config.overlap = 0;
        assert!(config.validate().is_ok());
    }
}
