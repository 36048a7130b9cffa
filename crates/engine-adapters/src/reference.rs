//! Reference catalog data.
//!
//! A compact SRD-flavored data set covering every ability-increase pattern
//! the engine normalizes. Backing-store adapters replace this in production;
//! tests and the demo runner seed from it.

use herodraft_domain::{
    Ability, AbilityChoice, AbilityIncrease, BackgroundDefinition, ClassDefinition, ClassFeature,
    EquipmentCategory, FlavorTable, GrantChoice, LanguageGrant, ProficiencyGrant, RaceDefinition,
    RacialTrait, SkillChoice, StartingMoney, ASI_LEVELS,
};

/// All reference races.
pub fn races() -> Vec<RaceDefinition> {
    vec![human(), half_elf(), hill_dwarf(), wood_elf(), custom_lineage()]
}

/// All reference classes.
pub fn classes() -> Vec<ClassDefinition> {
    vec![fighter(), wizard(), rogue(), cleric()]
}

/// All reference class features.
pub fn class_features() -> Vec<ClassFeature> {
    let mut features = Vec::new();
    for class in classes() {
        features.extend(asi_features(&class.id));
    }

    let mut second_wind = ClassFeature::new(
        "fighter_second_wind",
        "fighter",
        "Second Wind",
        1,
        "You have a limited well of stamina that you can draw on to protect yourself.",
    );
    second_wind.hidden = false;
    features.push(second_wind);

    let mut improved_critical = ClassFeature::new(
        "fighter_champion_improved_critical",
        "fighter",
        "Improved Critical",
        3,
        "Your weapon attacks score a critical hit on a roll of 19 or 20.",
    );
    improved_critical.subclass_id = Some("Champion".into());
    features.push(improved_critical);

    features.push(ClassFeature::new(
        "wizard_arcane_recovery",
        "wizard",
        "Arcane Recovery",
        1,
        "Once per day, recover expended spell slots during a short rest.",
    ));

    let mut sneak_attack_scaling = ClassFeature::new(
        "rogue_sneak_attack_internal",
        "rogue",
        "Sneak Attack Scaling",
        1,
        "Internal damage-scaling table for sneak attack.",
    );
    sneak_attack_scaling.hidden = true;
    features.push(sneak_attack_scaling);

    features
}

/// All reference backgrounds.
pub fn backgrounds() -> Vec<BackgroundDefinition> {
    vec![soldier(), sage(), acolyte()]
}

fn asi_features(class_id: &str) -> Vec<ClassFeature> {
    ASI_LEVELS
        .into_iter()
        .map(|level| {
            ClassFeature::new(
                format!("{}_asi_{}", class_id, level),
                class_id,
                "Ability Score Improvement",
                level,
                "Increase one ability score by 2, or two ability scores by 1 each.",
            )
        })
        .collect()
}

fn human() -> RaceDefinition {
    let mut def = RaceDefinition::new(
        "human",
        "Human",
        30,
        AbilityIncrease::FixedMulti { amount: 1 },
    );
    def.description = "Versatile and ambitious, humans are the most adaptable people.".into();
    def.languages = LanguageGrant {
        fixed: vec!["Common".into()],
        choose_any: 1,
    };
    def
}

fn half_elf() -> RaceDefinition {
    let mut def = RaceDefinition::new(
        "half-elf",
        "Half-Elf",
        30,
        AbilityIncrease::Custom {
            fixed: vec![(Ability::Charisma, 2)],
            choice: AbilityChoice::new(
                2,
                vec![
                    Ability::Strength,
                    Ability::Dexterity,
                    Ability::Constitution,
                    Ability::Intelligence,
                    Ability::Wisdom,
                ],
            ),
        },
    )
    .with_skills(ProficiencyGrant {
        fixed: vec![],
        choose: Some(GrantChoice::new(
            2,
            vec![
                "Persuasion".into(),
                "Deception".into(),
                "Insight".into(),
                "Perception".into(),
            ],
        )),
    })
    .with_languages(LanguageGrant {
        fixed: vec!["Common".into(), "Elvish".into()],
        choose_any: 1,
    })
    .with_trait(RacialTrait::new(
        "Fey Ancestry",
        "You have advantage on saving throws against being charmed.",
    ));
    def.description = "Walking in two worlds but truly belonging to neither.".into();
    def
}

fn hill_dwarf() -> RaceDefinition {
    let mut def = RaceDefinition::new(
        "hill-dwarf",
        "Hill Dwarf",
        25,
        AbilityIncrease::Custom {
            fixed: vec![(Ability::Constitution, 2), (Ability::Wisdom, 1)],
            choice: AbilityChoice::new(0, Vec::new()),
        },
    )
    .with_languages(LanguageGrant::fixed_only(vec![
        "Common".into(),
        "Dwarvish".into(),
    ]))
    .with_weapon_training(vec![
        EquipmentCategory::Longswords,
        EquipmentCategory::HandCrossbows,
    ])
    .with_hp_bonus_per_level(1)
    .with_trait(RacialTrait::new(
        "Darkvision",
        "You can see in dim light within 60 feet of you as if it were bright light.",
    ))
    .with_trait(RacialTrait::new(
        "Dwarven Toughness",
        "Your hit point maximum increases by 1 for every level you have.",
    ));
    def.tools = vec!["Smith's tools".into()];
    def.description = "Stout folk with keen senses and remarkable resilience.".into();
    def
}

fn wood_elf() -> RaceDefinition {
    let mut def = RaceDefinition::new(
        "wood-elf",
        "Wood Elf",
        35,
        AbilityIncrease::Custom {
            fixed: vec![(Ability::Dexterity, 2), (Ability::Wisdom, 1)],
            choice: AbilityChoice::new(0, Vec::new()),
        },
    )
    .with_skills(ProficiencyGrant::fixed_only(vec!["Perception".into()]))
    .with_languages(LanguageGrant::fixed_only(vec![
        "Common".into(),
        "Elvish".into(),
    ]))
    .with_trait(RacialTrait::new(
        "Mask of the Wild",
        "You can attempt to hide even when only lightly obscured by natural phenomena.",
    ));
    def.description = "Keen-sensed wanderers of forest and glade.".into();
    def
}

fn custom_lineage() -> RaceDefinition {
    let mut def = RaceDefinition::new("custom-lineage", "Custom Lineage", 30, AbilityIncrease::none())
        .with_languages(LanguageGrant {
            fixed: vec!["Common".into()],
            choose_any: 1,
        });
    def.description =
        "A lineage of your own design; its bonuses come entirely from your choices.".into();
    def
}

fn fighter() -> ClassDefinition {
    ClassDefinition {
        id: "fighter".into(),
        name: "Fighter".into(),
        hit_die: herodraft_domain::HitDie::D10,
        skill_choices: SkillChoice::new(
            2,
            vec![
                "Acrobatics".into(),
                "Animal Handling".into(),
                "Athletics".into(),
                "History".into(),
                "Insight".into(),
                "Intimidation".into(),
                "Perception".into(),
                "Survival".into(),
            ],
        ),
        saving_throws: vec![Ability::Strength, Ability::Constitution],
        armor_proficiencies: vec![
            EquipmentCategory::LightArmor,
            EquipmentCategory::MediumArmor,
            EquipmentCategory::HeavyArmor,
            EquipmentCategory::Shields,
        ],
        weapon_proficiencies: vec![
            EquipmentCategory::SimpleWeapons,
            EquipmentCategory::MartialWeapons,
        ],
        multiclass_proficiencies: vec![
            EquipmentCategory::LightArmor,
            EquipmentCategory::MediumArmor,
            EquipmentCategory::Shields,
            EquipmentCategory::SimpleWeapons,
            EquipmentCategory::MartialWeapons,
        ],
        subclass_selection_level: 3,
        subclasses: vec!["Champion".into(), "Battle Master".into()],
    }
}

fn wizard() -> ClassDefinition {
    ClassDefinition {
        id: "wizard".into(),
        name: "Wizard".into(),
        hit_die: herodraft_domain::HitDie::D6,
        skill_choices: SkillChoice::new(
            2,
            vec![
                "Arcana".into(),
                "History".into(),
                "Insight".into(),
                "Investigation".into(),
                "Medicine".into(),
                "Religion".into(),
            ],
        ),
        saving_throws: vec![Ability::Intelligence, Ability::Wisdom],
        armor_proficiencies: vec![],
        weapon_proficiencies: vec![
            EquipmentCategory::Daggers,
            EquipmentCategory::Darts,
            EquipmentCategory::Slings,
            EquipmentCategory::Quarterstaffs,
            EquipmentCategory::LightCrossbows,
        ],
        multiclass_proficiencies: vec![],
        subclass_selection_level: 2,
        subclasses: vec!["Evocation".into(), "Divination".into()],
    }
}

fn rogue() -> ClassDefinition {
    ClassDefinition {
        id: "rogue".into(),
        name: "Rogue".into(),
        hit_die: herodraft_domain::HitDie::D8,
        skill_choices: SkillChoice::new(
            4,
            vec![
                "Acrobatics".into(),
                "Athletics".into(),
                "Deception".into(),
                "Insight".into(),
                "Intimidation".into(),
                "Investigation".into(),
                "Perception".into(),
                "Performance".into(),
                "Persuasion".into(),
                "Sleight of Hand".into(),
                "Stealth".into(),
            ],
        ),
        saving_throws: vec![Ability::Dexterity, Ability::Intelligence],
        armor_proficiencies: vec![EquipmentCategory::LightArmor],
        weapon_proficiencies: vec![
            EquipmentCategory::SimpleWeapons,
            EquipmentCategory::HandCrossbows,
            EquipmentCategory::Longswords,
            EquipmentCategory::Rapiers,
            EquipmentCategory::Shortswords,
        ],
        multiclass_proficiencies: vec![EquipmentCategory::LightArmor],
        subclass_selection_level: 3,
        subclasses: vec!["Thief".into(), "Assassin".into()],
    }
}

fn cleric() -> ClassDefinition {
    ClassDefinition {
        id: "cleric".into(),
        name: "Cleric".into(),
        hit_die: herodraft_domain::HitDie::D8,
        skill_choices: SkillChoice::new(
            2,
            vec![
                "History".into(),
                "Insight".into(),
                "Medicine".into(),
                "Persuasion".into(),
                "Religion".into(),
            ],
        ),
        saving_throws: vec![Ability::Wisdom, Ability::Charisma],
        armor_proficiencies: vec![
            EquipmentCategory::LightArmor,
            EquipmentCategory::MediumArmor,
            EquipmentCategory::Shields,
        ],
        weapon_proficiencies: vec![EquipmentCategory::SimpleWeapons],
        multiclass_proficiencies: vec![
            EquipmentCategory::LightArmor,
            EquipmentCategory::MediumArmor,
            EquipmentCategory::Shields,
        ],
        subclass_selection_level: 1,
        subclasses: vec!["Life Domain".into(), "Light Domain".into()],
    }
}

fn soldier() -> BackgroundDefinition {
    BackgroundDefinition::new("soldier", "Soldier")
        .with_skills(ProficiencyGrant::fixed_only(vec![
            "Athletics".into(),
            "Intimidation".into(),
        ]))
        .with_tools(ProficiencyGrant {
            fixed: vec!["Dice set".into()],
            choose: Some(GrantChoice::new(
                1,
                vec!["Vehicles (land)".into(), "Playing card set".into()],
            )),
        })
        .with_equipment(
            vec![
                "Insignia of rank".into(),
                "Trophy taken from a fallen enemy".into(),
                "Common clothes".into(),
            ],
            StartingMoney::gp(10),
        )
        .with_flavor(FlavorTable {
            name: "Personality Trait".into(),
            entries: vec![
                "I'm always polite and respectful.".into(),
                "I'm haunted by memories of war.".into(),
                "I can stare down a hell hound without flinching.".into(),
            ],
        })
}

fn sage() -> BackgroundDefinition {
    BackgroundDefinition::new("sage", "Sage")
        .with_skills(ProficiencyGrant::fixed_only(vec![
            "Arcana".into(),
            "History".into(),
        ]))
        .with_languages(LanguageGrant {
            fixed: vec![],
            choose_any: 2,
        })
        .with_equipment(
            vec![
                "Bottle of black ink".into(),
                "Quill".into(),
                "Letter from a dead colleague".into(),
            ],
            StartingMoney::gp(10),
        )
}

fn acolyte() -> BackgroundDefinition {
    BackgroundDefinition::new("acolyte", "Acolyte")
        .with_skills(ProficiencyGrant::fixed_only(vec![
            "Insight".into(),
            "Religion".into(),
        ]))
        .with_languages(LanguageGrant {
            fixed: vec![],
            choose_any: 2,
        })
        .with_equipment(
            vec![
                "Holy symbol".into(),
                "Prayer book".into(),
                "Vestments".into(),
            ],
            StartingMoney::gp(15),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_races_cover_every_increase_pattern() {
        let races = races();
        assert!(races
            .iter()
            .any(|r| matches!(r.ability_increase, AbilityIncrease::FixedMulti { .. })));
        assert!(races
            .iter()
            .any(|r| matches!(&r.ability_increase, AbilityIncrease::Custom { choice, .. } if choice.count > 0)));
        assert!(races
            .iter()
            .any(|r| r.hp_bonus_per_level > 0));
    }

    #[test]
    fn every_class_has_asi_features_at_standard_levels() {
        let features = class_features();
        for class in classes() {
            for level in ASI_LEVELS {
                assert!(
                    features.iter().any(|f| f.class_id == class.id
                        && f.level == level
                        && f.is_ability_score_improvement()),
                    "{} missing ASI at level {}",
                    class.id,
                    level
                );
            }
        }
    }

    #[test]
    fn reference_skills_exist_in_the_catalog() {
        for class in classes() {
            for skill in &class.skill_choices.pool {
                assert!(
                    herodraft_domain::is_known_skill(skill),
                    "unknown skill {} in {}",
                    skill,
                    class.id
                );
            }
        }
        for background in backgrounds() {
            for skill in &background.skills.fixed {
                assert!(herodraft_domain::is_known_skill(skill));
            }
        }
    }
}
