//! Loads the shipped data directory end to end, exercising every
//! cross-document check against real documents.

use std::collections::HashMap;
use std::path::PathBuf;

use coven_content::ContentFactory;
use coven_core::{AbilityCategory, ClassCategory, StatusEffectKind};

fn shipped_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn shipped_data_loads_and_cross_references() {
    let content = ContentFactory::new(shipped_data())
        .load_all()
        .expect("shipped data must load");

    // Every class's progression resolved against the ability table, and
    // every race's class list against the class table, or load_all would
    // have failed. Spot-check the catalogs on top of that.
    assert_eq!(content.classes.available().len(), 4);
    assert!(content.abilities.get("fireball").is_some());
    assert_eq!(
        content.classes.get_by_category(ClassCategory::Magic)[0].id,
        "mage"
    );

    let warrior_races = content.races.compatible_with_class("warrior");
    assert!(warrior_races.iter().any(|r| r.id == "orc"));

    let dots = content
        .status_effects
        .get_by_kind(StatusEffectKind::DamageOverTime);
    assert_eq!(dots.len(), 2);

    let attack_count = content
        .abilities
        .get_by_category(AbilityCategory::Attack)
        .len();
    assert!(attack_count >= 5);
}

#[test]
fn shipped_progression_unlocks_in_order() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();

    let at_level_1 = content.classes.abilities_for("warrior", 1);
    assert_eq!(at_level_1, vec!["slash", "shieldWall"]);

    let at_level_5 = content.classes.abilities_for("warrior", 5);
    assert!(at_level_5.contains(&"berserk".to_string()));
}

#[test]
fn shipped_messages_render() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();

    let args = HashMap::from([
        ("attacker".to_string(), "Maeve".to_string()),
        ("damage".to_string(), "12".to_string()),
    ]);
    assert_eq!(
        content.messages.render("monsterHit", &args).as_deref(),
        Some("Maeve strikes the monster for 12 damage")
    );
}

#[test]
fn message_batch_lookup_skips_unknown_ids() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();
    let picked = content
        .messages
        .get_many(["monsterHit", "notAMessage", "playerDown"]);
    assert_eq!(picked.len(), 2);
    assert_eq!(picked[0].id, "monsterHit");
}

#[test]
fn shipped_balance_feeds_the_calc_engine() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();
    let config = content.balance.config();

    assert_eq!(coven_core::warlock_count(&config, 8), 2);
    assert!(coven_core::comeback_active(&config, 2, 10));
}

#[test]
fn missing_directory_fails_with_context() {
    let err = ContentFactory::new("/definitely/not/here")
        .load_all()
        .err()
        .expect("load must fail");
    assert!(err.to_string().contains("ability table"));
}
