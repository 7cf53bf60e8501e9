//! Roster loader.
//!
//! Loads party and enemy snapshots from RON files. Each file is a plain
//! `Vec<CombatUnit>` whose stats are already fully resolved.

use std::collections::BTreeSet;
use std::path::Path;

use combat_core::{CombatConfig, CombatUnit, Faction, WeaponSlot};

use crate::loaders::{LoadResult, read_file};

/// Loader for roster snapshots from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load any roster, validating every unit.
    pub fn load(path: &Path) -> LoadResult<Vec<CombatUnit>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid roster {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CombatUnit>> {
        let units: Vec<CombatUnit> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;
        for unit in &units {
            validate(unit)?;
        }
        Ok(units)
    }

    /// Load a roster that must contain player units only.
    pub fn load_party(path: &Path) -> LoadResult<Vec<CombatUnit>> {
        let units = Self::load(path)?;
        ensure_party(&units)
            .map_err(|e| anyhow::anyhow!("party roster {}: {}", path.display(), e))?;
        Ok(units)
    }

    /// Load a roster that must not contain player units.
    pub fn load_enemies(path: &Path) -> LoadResult<Vec<CombatUnit>> {
        let units = Self::load(path)?;
        ensure_enemies(&units)
            .map_err(|e| anyhow::anyhow!("enemy roster {}: {}", path.display(), e))?;
        Ok(units)
    }
}

fn ensure_party(units: &[CombatUnit]) -> LoadResult<()> {
    if let Some(unit) = units.iter().find(|unit| !unit.faction.is_player()) {
        anyhow::bail!("contains {} of faction {}", unit.id, unit.faction);
    }
    Ok(())
}

fn ensure_enemies(units: &[CombatUnit]) -> LoadResult<()> {
    if let Some(unit) = units.iter().find(|unit| unit.faction == Faction::Player) {
        anyhow::bail!("contains player unit {}", unit.id);
    }
    Ok(())
}

fn validate(unit: &CombatUnit) -> LoadResult<()> {
    anyhow::ensure!(
        unit.stats.hp <= unit.stats.max_hp,
        "unit {} has hp {} above max_hp {}",
        unit.id,
        unit.stats.hp,
        unit.stats.max_hp
    );

    use strum::IntoEnumIterator;
    for slot in WeaponSlot::iter() {
        let Some(weapon) = unit.equipment.weapon(slot) else {
            continue;
        };
        anyhow::ensure!(
            weapon.category == slot.category(),
            "unit {}: {} is not a {:?} weapon",
            unit.id,
            weapon.name,
            slot.category()
        );
        anyhow::ensure!(
            weapon.attacks_per_turn <= CombatConfig::MAX_SWINGS,
            "unit {}: {} swings {} times, limit is {}",
            unit.id,
            weapon.name,
            weapon.attacks_per_turn,
            CombatConfig::MAX_SWINGS
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&weapon.lethality),
            "unit {}: {} has lethality {} outside 0..=1",
            unit.id,
            weapon.name,
            weapon.lethality
        );
    }
    Ok(())
}

/// Both rosters of one battle.
///
/// Serialized as `(party: [...], enemies: [...])` for single-file encounters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub party: Vec<CombatUnit>,
    pub enemies: Vec<CombatUnit>,
}

impl Encounter {
    /// Pairs two rosters, rejecting ids used on both sides.
    pub fn new(party: Vec<CombatUnit>, enemies: Vec<CombatUnit>) -> LoadResult<Self> {
        let mut seen = BTreeSet::new();
        for unit in party.iter().chain(&enemies) {
            anyhow::ensure!(seen.insert(unit.id), "unit id {} is used twice", unit.id);
        }
        Ok(Self { party, enemies })
    }

    pub fn load(party: &Path, enemies: &Path) -> LoadResult<Self> {
        Self::new(
            RosterLoader::load_party(party)?,
            RosterLoader::load_enemies(enemies)?,
        )
    }

    /// Load a single-file encounter holding both rosters.
    pub fn load_file(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid encounter {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Self> {
        let raw: Encounter = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;
        for unit in raw.party.iter().chain(&raw.enemies) {
            validate(unit)?;
        }
        ensure_party(&raw.party).map_err(|e| anyhow::anyhow!("party {}", e))?;
        ensure_enemies(&raw.enemies).map_err(|e| anyhow::anyhow!("enemies {}", e))?;
        Self::new(raw.party, raw.enemies)
    }

    /// Bundled demo encounter.
    pub fn sample() -> LoadResult<Self> {
        let dir = crate::bundled_data_dir().join("rosters");
        Self::load(&dir.join("party.ron"), &dir.join("raiders.ron"))
    }

    pub fn into_units(self) -> Vec<CombatUnit> {
        let mut units = self.party;
        units.extend(self.enemies);
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::UnitId;
    use std::io::Write;

    const SCAVENGER: &str = r#"[
        (
            id: (1),
            template_id: "scavenger",
            faction: player,
            stats: (hp: 20, max_hp: 20, melee_skill: 30, initiative: 8),
            equipment: (
                melee_primary: Some((
                    name: "machete",
                    category: Melee,
                    damage: (min: 4, max: 7),
                    armor_piercing: 0,
                    attacks_per_turn: 2,
                    range: 0,
                    lethality: 0.4,
                )),
            ),
            active_slot: MeleePrimary,
            line: 0,
        ),
    ]"#;

    #[test]
    fn parses_roster_with_defaults() {
        let units = RosterLoader::parse(SCAVENGER).expect("parse");
        assert_eq!(units.len(), 1);
        let unit = &units[0];
        assert_eq!(unit.faction, Faction::Player);
        assert!(unit.is_alive());
        assert_eq!(unit.stats.evasion, 0);
        assert_eq!(unit.active_weapon().map(|w| w.attacks_per_turn), Some(2));
    }

    #[test]
    fn party_loader_rejects_enemies() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SCAVENGER.replace("faction: player", "faction: raiders").as_bytes())
            .expect("write");

        let error = RosterLoader::load_party(file.path()).unwrap_err();
        assert!(error.to_string().contains("raiders"));
        assert!(RosterLoader::load_enemies(file.path()).is_ok());
    }

    #[test]
    fn weapon_in_wrong_slot_is_rejected() {
        let roster = SCAVENGER.replace("melee_primary:", "ranged_primary:");
        assert!(RosterLoader::parse(&roster).is_err());
    }

    #[test]
    fn encounter_rejects_shared_ids() {
        let party = RosterLoader::parse(SCAVENGER).expect("parse");
        let mut enemies = party.clone();
        enemies[0].faction = Faction::Mutants;
        assert!(Encounter::new(party, enemies).is_err());
    }

    #[test]
    fn single_file_encounter_is_validated() {
        let units = SCAVENGER.trim().trim_start_matches('[').trim_end_matches(']');
        let ally = units.trim().trim_end_matches(',');
        let enemy = ally
            .replace("id: (1)", "id: (9)")
            .replace("faction: player", "faction: beasts");

        let encounter = Encounter::parse(&format!("(party: [{ally}], enemies: [{enemy}])"))
            .expect("encounter");
        assert_eq!(encounter.party[0].id, UnitId(1));
        assert_eq!(encounter.enemies[0].faction, Faction::Beasts);

        let swapped = format!("(party: [{enemy}], enemies: [{ally}])");
        assert!(Encounter::parse(&swapped).is_err());

        let twin = ally.replace("faction: player", "faction: beasts");
        let shared = format!("(party: [{ally}], enemies: [{twin}])");
        assert!(Encounter::parse(&shared).is_err());
    }

    #[test]
    fn bundled_encounter_loads() {
        let encounter = Encounter::sample().expect("sample encounter");
        assert!(!encounter.party.is_empty());
        assert!(!encounter.enemies.is_empty());
        assert!(encounter.party.iter().all(|unit| unit.faction.is_player()));
    }
}
