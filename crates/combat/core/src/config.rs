/// Hit-chance tuning, all in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitChanceParams {
    pub base: i32,
    pub min: u32,
    pub max: u32,
}

impl Default for HitChanceParams {
    fn default() -> Self {
        Self {
            base: CombatConfig::DEFAULT_HIT_BASE,
            min: CombatConfig::DEFAULT_HIT_MIN,
            max: CombatConfig::DEFAULT_HIT_MAX,
        }
    }
}

/// Battle rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub hit_chance: HitChanceParams,
    /// Damage multiplier applied to a critical swing.
    pub crit_multiplier: u32,
    /// Delay points charged per swing of an attack.
    pub attack_delay_per_swing: u32,
    /// Flat delay points added to every attack regardless of swings.
    pub attack_base_delay: u32,
    /// Delay points charged for a reposition.
    pub reposition_delay: u32,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Numerator of the cadence formula `100 / initiative`.
    pub const CADENCE_NUMERATOR: f64 = 100.0;
    /// Upper bound on swings per attack accepted from roster data.
    pub const MAX_SWINGS: u8 = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HIT_BASE: i32 = 50;
    pub const DEFAULT_HIT_MIN: u32 = 5;
    pub const DEFAULT_HIT_MAX: u32 = 100;
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 2;
    pub const DEFAULT_ATTACK_DELAY_PER_SWING: u32 = 10;
    pub const DEFAULT_ATTACK_BASE_DELAY: u32 = 0;
    pub const DEFAULT_REPOSITION_DELAY: u32 = 5;

    pub fn new() -> Self {
        Self {
            hit_chance: HitChanceParams::default(),
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            attack_delay_per_swing: Self::DEFAULT_ATTACK_DELAY_PER_SWING,
            attack_base_delay: Self::DEFAULT_ATTACK_BASE_DELAY,
            reposition_delay: Self::DEFAULT_REPOSITION_DELAY,
        }
    }

    /// Delay points for an attack with `swings` swings.
    pub fn attack_delay(&self, swings: u8) -> u32 {
        self.attack_base_delay + self.attack_delay_per_swing * swings as u32
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
