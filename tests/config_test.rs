use moodboard::config::{Config, MoodCatalog};
use moodboard::error::Error;

// Both cases touch the same process environment, so they run in one test.
#[test]
fn config_from_env_defaults_and_validation() {
    unsafe {
        std::env::remove_var("MOODBOARD_TIMEZONE");
        std::env::remove_var("MOODBOARD_DATA");
        std::env::remove_var("MOODBOARD_MOODS");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.timezone, chrono_tz::Europe::Paris);
    assert_eq!(config.data_path, std::path::PathBuf::from("moodboard.json"));
    assert!(config.moods_path.is_none());
    assert!(!config.log_level.is_empty());
    assert_eq!(config.mood_catalog().unwrap(), MoodCatalog::default());

    unsafe {
        std::env::set_var("MOODBOARD_TIMEZONE", "America/Montreal");
        std::env::set_var("MOODBOARD_DATA", "/tmp/board.json");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.timezone, chrono_tz::America::Montreal);
    assert_eq!(config.data_path, std::path::PathBuf::from("/tmp/board.json"));

    unsafe {
        std::env::set_var("MOODBOARD_TIMEZONE", "Nowhere/Special");
    }
    assert!(matches!(Config::from_env(), Err(Error::InvalidTimezone(_))));

    // Clean up
    unsafe {
        std::env::remove_var("MOODBOARD_TIMEZONE");
        std::env::remove_var("MOODBOARD_DATA");
    }
}

#[test]
fn mood_catalog_loads_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moods.toml");
    std::fs::write(
        &path,
        r#"
[[mood]]
id = 10
label = "Curious"
emoji = "🧐"
color = "bg-teal-400"

[[mood]]
id = 11
label = "Cozy"
emoji = "☕"
color = "bg-orange-400"
"#,
    )
    .unwrap();

    let catalog = MoodCatalog::load(&path).unwrap();
    assert_eq!(catalog.as_slice().len(), 2);
    assert_eq!(catalog.get(11).unwrap().label, "Cozy");
    assert!(!catalog.contains(1));

    let missing = MoodCatalog::load(&dir.path().join("nope.toml"));
    assert!(matches!(missing, Err(Error::Config(_))));
}
