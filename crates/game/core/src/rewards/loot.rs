//! Death loot.

use crate::combat::{KillRecord, RoundOutcome};
use crate::config::CombatConfig;
use crate::env::{CombatEnv, RngOracle};
use crate::state::{
    Character, LootItem, MonsterId, MonsterTemplate, PotionKind, Quality, TemplateId,
};

/// What one killed monster left behind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub monster_id: MonsterId,
    pub template_id: TemplateId,
    pub monster_name: String,
    /// Gold rolled when the monster died; credited by
    /// [`distribute_rewards`](super::distribute_rewards), not here.
    pub copper: u64,
    pub items: Vec<LootItem>,
}

/// Rolls potion and equipment drops for every kill in `outcome` and appends
/// them to the character's inventory.
///
/// Kills whose template is no longer in the catalog still report their gold
/// but drop no items.
pub fn process_death_loot(
    character: &mut Character,
    outcome: &RoundOutcome,
    env: &CombatEnv<'_>,
    rng: &mut dyn RngOracle,
) -> Vec<LootDrop> {
    let mut drops = Vec::with_capacity(outcome.kills.len());

    for kill in &outcome.kills {
        let items = match env.monsters.template(kill.template_id) {
            Some(template) => roll_items(character.level, kill, template, env.config, rng),
            None => Vec::new(),
        };
        character.inventory.extend(items.iter().cloned());

        drops.push(LootDrop {
            monster_id: kill.monster_id,
            template_id: kill.template_id,
            monster_name: kill.name.clone(),
            copper: kill.copper,
            items,
        });
    }

    drops
}

fn roll_items(
    character_level: u32,
    kill: &KillRecord,
    template: &MonsterTemplate,
    config: &CombatConfig,
    rng: &mut dyn RngOracle,
) -> Vec<LootItem> {
    let multiplier = kill.monster_type.multiplier();
    let level = drop_level(character_level, kill.level, config.loot_level_delta);
    let mut items = Vec::new();

    if rng.chance(template.drops.potion_chance * multiplier) {
        let kind = if rng.range(1, 100) as u32 <= config.potion_hp_share {
            PotionKind::Health
        } else {
            PotionKind::Mana
        };
        items.push(LootItem::Potion { kind, level });
    }

    if !template.drops.item_types.is_empty()
        && rng.chance(template.drops.item_chance * multiplier)
    {
        let item_type = template.drops.item_types[rng.pick_index(template.drops.item_types.len())];
        let quality = roll_quality(rng, multiplier);
        items.push(LootItem::Equipment {
            item_type,
            quality,
            level,
        });
    }

    items
}

/// `uniform(1, 100) × multiplier` mapped through [`Quality::from_roll`].
pub fn roll_quality(rng: &mut dyn RngOracle, multiplier: f64) -> Quality {
    Quality::from_roll(rng.roll_d100() as f64 * multiplier)
}

/// `max(1, min(character_level, monster_level + delta))`
pub fn drop_level(character_level: u32, monster_level: u32, delta: u32) -> u32 {
    character_level
        .min(monster_level.saturating_add(delta))
        .max(1)
}
