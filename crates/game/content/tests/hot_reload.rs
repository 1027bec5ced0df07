//! End-to-end reload behavior against a real temporary directory.

use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use coven_content::{AbilityLoader, ContentError};
use tempfile::TempDir;

const VALID: &str = r#"
[abilities.slash]
name = "Slash"
buttonText = "Slash"
category = "attack"
damage = 10
cooldown = 0
"#;

const VALID_V2: &str = r#"
[abilities.slash]
name = "Slash"
buttonText = "Slash"
category = "attack"
damage = 10
cooldown = 0

[abilities.guard]
name = "Guard"
buttonText = "Guard"
category = "defense"
cooldown = 1
"#;

// Structurally fine, semantically not: negative damage.
const INVALID: &str = r#"
[abilities.slash]
name = "Slash"
buttonText = "Slash"
category = "attack"
damage = -5
cooldown = 0
"#;

// Filesystem mtime granularity can swallow quick successive writes, so give
// each revision an explicit, distinct modification time.
fn write_revision(path: &Path, contents: &str, revision: u64) {
    fs::write(path, contents).unwrap();
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(1_700_000_000 + revision))
        .unwrap();
}

#[test]
fn missing_source_fails_construction() {
    let dir = TempDir::new().unwrap();
    let err = AbilityLoader::new(Some(dir.path().join("nope.toml")))
        .err()
        .expect("missing source must fail construction");
    assert!(matches!(err, ContentError::SourceNotFound(_)));
}

#[test]
fn invalid_source_fails_construction() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abilities.toml");
    write_revision(&path, INVALID, 0);

    let err = AbilityLoader::new(Some(path))
        .err()
        .expect("invalid source must fail construction");
    assert!(matches!(err, ContentError::Validation(_)));
}

#[test]
fn unchanged_source_never_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abilities.toml");
    write_revision(&path, VALID, 0);

    let loader = AbilityLoader::new(Some(path)).unwrap();
    assert!(!loader.reload_if_changed());
    assert!(!loader.reload_if_changed());
}

#[test]
fn valid_change_swaps_the_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abilities.toml");
    write_revision(&path, VALID, 0);

    let loader = AbilityLoader::new(Some(path.clone())).unwrap();
    assert!(loader.get("guard").is_none());

    write_revision(&path, VALID_V2, 1);
    assert!(loader.reload_if_changed());
    assert!(loader.get("guard").is_some());

    // The new marker is now current.
    assert!(!loader.reload_if_changed());
}

#[test]
fn invalid_change_keeps_the_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abilities.toml");
    write_revision(&path, VALID, 0);

    let loader = AbilityLoader::new(Some(path.clone())).unwrap();

    write_revision(&path, INVALID, 1);
    assert!(!loader.reload_if_changed());
    assert!(loader.get("slash").is_some());

    // A later good revision is still picked up.
    write_revision(&path, VALID_V2, 2);
    assert!(loader.reload_if_changed());
    assert!(loader.get("guard").is_some());
}

#[test]
fn lookups_trigger_the_reload_check_themselves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abilities.toml");
    write_revision(&path, VALID, 0);

    let loader = AbilityLoader::new(Some(path.clone())).unwrap();

    write_revision(&path, VALID_V2, 1);
    // No explicit reload call; get() checks the marker on its way in.
    assert!(loader.get("guard").is_some());
}
