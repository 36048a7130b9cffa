//! Multiclass hit-point rolling.
//!
//! The stored raw dice are the source of truth. Rolling happens once per
//! session; when a dependency changes afterwards (Constitution, a race HP
//! bonus) the totals are recomputed over the preserved dice, with only the
//! modifiers re-applied.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::draft::ClassEntry;
use crate::value_objects::dice::HitDie;

/// Raw hit dice rolled for one class entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassHitRoll {
    class_id: String,
    hit_die: HitDie,
    level: u8,
    /// One raw die result per level after the first; the first level of each
    /// class takes the die maximum instead of a roll.
    rolls: Vec<u8>,
}

impl ClassHitRoll {
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn hit_die(&self) -> HitDie {
        self.hit_die
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn rolls(&self) -> &[u8] {
        &self.rolls
    }

    /// Subtotal for this class with the current Constitution modifier,
    /// floored at one hit point per level.
    pub fn subtotal(&self, con_modifier: i32) -> i32 {
        let dice_total =
            self.hit_die.max() as i32 + self.rolls.iter().map(|r| *r as i32).sum::<i32>();
        let raw = dice_total + con_modifier * self.level as i32;
        raw.max(self.level as i32)
    }
}

/// Per-class subtotal in a recomputed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSubtotal {
    pub class_id: String,
    pub subtotal: i32,
}

/// A recomputed hit-point total with its per-class breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPointTotal {
    pub total: i32,
    pub per_class: Vec<ClassSubtotal>,
}

/// The frozen dice of one session's hit-point roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPointRoll {
    per_class: Vec<ClassHitRoll>,
}

impl HitPointRoll {
    /// Roll hit dice for every class entry.
    ///
    /// Level 1 of each class contributes the die maximum (no roll); every
    /// further level stores one raw `1..=die` result.
    pub fn roll(entries: &[ClassEntry], rng: &mut impl Rng) -> Self {
        let per_class = entries
            .iter()
            .map(|entry| {
                let rolls = (1..entry.level)
                    .map(|_| entry.hit_die.roll(rng))
                    .collect();
                ClassHitRoll {
                    class_id: entry.class_id.clone(),
                    hit_die: entry.hit_die,
                    level: entry.level,
                    rolls,
                }
            })
            .collect();
        Self { per_class }
    }

    pub fn per_class(&self) -> &[ClassHitRoll] {
        &self.per_class
    }

    /// Re-apply modifiers over the stored dice.
    ///
    /// `hp_per_level` is the flat race bonus, applied `character_level` times
    /// once, regardless of how many classes the levels are spread over.
    pub fn recompute(
        &self,
        con_modifier: i32,
        hp_per_level: i32,
        character_level: u8,
    ) -> HitPointTotal {
        let per_class: Vec<ClassSubtotal> = self
            .per_class
            .iter()
            .map(|roll| ClassSubtotal {
                class_id: roll.class_id.clone(),
                subtotal: roll.subtotal(con_modifier),
            })
            .collect();
        let total = per_class.iter().map(|c| c.subtotal).sum::<i32>()
            + hp_per_level * character_level as i32;
        HitPointTotal { total, per_class }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn fighter(level: u8) -> ClassEntry {
        ClassEntry::new("fighter", "Fighter", HitDie::D10).with_level(level)
    }

    fn wizard(level: u8) -> ClassEntry {
        ClassEntry::new("wizard", "Wizard", HitDie::D6).with_level(level)
    }

    #[test]
    fn level_one_fighter_takes_max_die() {
        let mut rng = StdRng::seed_from_u64(1);
        let roll = HitPointRoll::roll(&[fighter(1)], &mut rng);
        assert!(roll.per_class()[0].rolls().is_empty());

        let total = roll.recompute(2, 0, 1);
        assert_eq!(total.total, 12);
        assert_eq!(total.per_class[0].subtotal, 12);
    }

    #[test]
    fn multiclass_breakdown_sums_per_class() {
        let mut rng = StdRng::seed_from_u64(42);
        let entries = [fighter(3), wizard(2)];
        let roll = HitPointRoll::roll(&entries, &mut rng);

        assert_eq!(roll.per_class()[0].rolls().len(), 2);
        assert_eq!(roll.per_class()[1].rolls().len(), 1);

        let con_mod = 2;
        let total = roll.recompute(con_mod, 0, 5);

        let fighter_dice: i32 = 10 + roll.per_class()[0]
            .rolls()
            .iter()
            .map(|r| *r as i32)
            .sum::<i32>();
        let wizard_dice: i32 = 6 + roll.per_class()[1]
            .rolls()
            .iter()
            .map(|r| *r as i32)
            .sum::<i32>();
        assert_eq!(total.per_class[0].subtotal, fighter_dice + con_mod * 3);
        assert_eq!(total.per_class[1].subtotal, wizard_dice + con_mod * 2);
        assert_eq!(
            total.total,
            total.per_class[0].subtotal + total.per_class[1].subtotal
        );
    }

    #[test]
    fn per_class_subtotal_floored_at_level() {
        let mut rng = StdRng::seed_from_u64(3);
        let entries = [fighter(4), wizard(3)];
        let roll = HitPointRoll::roll(&entries, &mut rng);

        // A Constitution modifier deep below any die result.
        let total = roll.recompute(-20, 0, 7);
        assert_eq!(total.per_class[0].subtotal, 4);
        assert_eq!(total.per_class[1].subtotal, 3);
        assert!(total.total >= 7);
    }

    #[test]
    fn recompute_preserves_raw_dice() {
        let mut rng = StdRng::seed_from_u64(9);
        let roll = HitPointRoll::roll(&[fighter(5)], &mut rng);
        let dice_before: Vec<u8> = roll.per_class()[0].rolls().to_vec();

        let with_low_con = roll.recompute(-1, 0, 5);
        let with_high_con = roll.recompute(3, 0, 5);

        assert_eq!(roll.per_class()[0].rolls(), dice_before.as_slice());
        // Only the modifier times level separates the two recomputes.
        assert_eq!(with_high_con.total - with_low_con.total, 4 * 5);
    }

    #[test]
    fn race_hp_bonus_applies_once_per_character_level() {
        let mut rng = StdRng::seed_from_u64(5);
        let entries = [fighter(3), wizard(2)];
        let roll = HitPointRoll::roll(&entries, &mut rng);

        let plain = roll.recompute(0, 0, 5);
        let dwarven = roll.recompute(0, 1, 5);
        assert_eq!(dwarven.total - plain.total, 5);
    }
}
