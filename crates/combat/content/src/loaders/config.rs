//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        anyhow::ensure!(
            config.hit_chance.min <= config.hit_chance.max,
            "hit_chance.min ({}) exceeds hit_chance.max ({})",
            config.hit_chance.min,
            config.hit_chance.max
        );
        anyhow::ensure!(
            config.hit_chance.max <= 100,
            "hit_chance.max must be a percentage, got {}",
            config.hit_chance.max
        );
        anyhow::ensure!(
            config.crit_multiplier >= 1,
            "crit_multiplier must be at least 1"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            crit_multiplier = 3

            [hit_chance]
            base = 40
            "#,
        )
        .expect("parse");

        assert_eq!(config.crit_multiplier, 3);
        assert_eq!(config.hit_chance.base, 40);
        assert_eq!(config.hit_chance.min, CombatConfig::DEFAULT_HIT_MIN);
        assert_eq!(config.reposition_delay, CombatConfig::DEFAULT_REPOSITION_DELAY);
    }

    #[test]
    fn inverted_hit_bounds_are_rejected() {
        let error = ConfigLoader::parse(
            r#"
            [hit_chance]
            min = 90
            max = 10
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("exceeds"));
    }

    #[test]
    fn bundled_config_loads() {
        let path = crate::bundled_data_dir().join("config/combat.toml");
        let config = ConfigLoader::load(&path).expect("bundled config");
        assert_eq!(config, CombatConfig::default());
    }
}
