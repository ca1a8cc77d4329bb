#![forbid(unsafe_code)]

use std::path::PathBuf;

pub const DEFAULT_LEVEL: i32 = 6;

/// Run options shared by the classifier and the packer. Built once from the
/// command line and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    pub recursive: bool,
    pub test_dates: bool,
    pub verbose: bool,
    pub exceptions: Option<PathBuf>,
    /// zstd level, 1..=22.
    pub level: i32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            test_dates: false,
            verbose: false,
            exceptions: None,
            level: DEFAULT_LEVEL,
        }
    }
}

impl PackConfig {
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level.clamp(1, 22);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PackConfig::default();
        assert!(!cfg.recursive);
        assert!(!cfg.test_dates);
        assert_eq!(cfg.exceptions, None);
        assert_eq!(cfg.level, DEFAULT_LEVEL);
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(PackConfig::default().with_level(0).level, 1);
        assert_eq!(PackConfig::default().with_level(99).level, 22);
        assert_eq!(PackConfig::default().with_level(9).level, 9);
    }
}
