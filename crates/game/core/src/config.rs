/// Combat balance constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Upper bound for the effective critical-hit chance (0.0–1.0).
    pub crit_rate_cap: f64,
    /// Critical damage factor before equipment bonuses.
    pub crit_damage_base: f64,
    /// Dropped loot never exceeds the monster level by more than this.
    pub loot_level_delta: u32,
    /// Share of potion drops that restore HP (percent, the rest restore MP).
    pub potion_hp_share: u32,
    /// Largest encounter a map can roll, difficulty bonus included.
    pub max_pack_size: u32,
}

impl CombatConfig {
    // ===== fixed rules =====
    /// Minimum damage any landed hit deals.
    pub const MIN_DAMAGE: u32 = 1;
    pub const MAX_LEVEL: u32 = 100;
    pub const STAT_POINTS_PER_LEVEL: u32 = 5;
    pub const SKILL_POINTS_PER_LEVEL: u32 = 1;
    /// Crit-rate contribution of each dexterity point.
    pub const CRIT_PER_DEXTERITY: f64 = 0.002;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CRIT_RATE_CAP: f64 = 0.75;
    pub const DEFAULT_CRIT_DAMAGE_BASE: f64 = 1.5;
    pub const DEFAULT_LOOT_LEVEL_DELTA: u32 = 2;
    pub const DEFAULT_POTION_HP_SHARE: u32 = 60;
    pub const DEFAULT_MAX_PACK_SIZE: u32 = 5;

    pub fn new() -> Self {
        Self {
            crit_rate_cap: Self::DEFAULT_CRIT_RATE_CAP,
            crit_damage_base: Self::DEFAULT_CRIT_DAMAGE_BASE,
            loot_level_delta: Self::DEFAULT_LOOT_LEVEL_DELTA,
            potion_hp_share: Self::DEFAULT_POTION_HP_SHARE,
            max_pack_size: Self::DEFAULT_MAX_PACK_SIZE,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
