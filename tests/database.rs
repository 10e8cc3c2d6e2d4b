// SQLite database: favorites and settings persistence.

mod common;

use chrono::{TimeZone, Utc};
use common::open_temp_db;
use skyplayer::db::Database;
use skyplayer::favorites::{FavoriteEntry, Favorites};
use skyplayer::theme::SkyMode;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn entry(id: &str, url: &str) -> FavoriteEntry {
    FavoriteEntry {
        id: id.to_string(),
        url: url.to_string(),
        title: id.to_string(),
        added_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
    }
}

// ── SQLite operations ────────────────────────────────────────────────────────

#[test]
fn test_database_open_creates_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("skyplayer_test.db");
    assert!(!path.exists());
    let _db = Database::open_at(&path).expect("open db");
    assert!(path.exists());
}

#[test]
fn test_reopen_runs_migrations_again() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.db");
    Database::open_at(&path).expect("first open");
    Database::open_at(&path).expect("second open");
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[test]
fn test_save_and_load_favorites_keeps_order() {
    let (db, _dir) = open_temp_db();
    let entries = vec![
        entry("3", "https://a.test/three.mp3"),
        entry("1", "https://a.test/one.mp3"),
        entry("2", "https://a.test/two.mp3"),
    ];
    db.save_favorites(&entries).expect("save");

    let loaded = db.load_favorites().expect("load");
    assert_eq!(loaded, entries);
}

#[test]
fn test_save_replaces_previous_list() {
    let (db, _dir) = open_temp_db();
    db.save_favorites(&[entry("1", "https://a.test/one.mp3")])
        .expect("save");
    db.save_favorites(&[]).expect("save empty");
    assert!(db.load_favorites().expect("load").is_empty());
}

#[test]
fn test_toggled_favorites_round_trip() {
    let (db, _dir) = open_temp_db();
    let mut favorites = Favorites::new();
    favorites.toggle("https://a.test/first.flac", Utc.timestamp_millis_opt(1_000).unwrap());
    favorites.toggle("https://a.test/second.wav", Utc.timestamp_millis_opt(2_000).unwrap());
    db.save_favorites(favorites.entries()).expect("save");

    let reloaded = Favorites::from_entries(db.load_favorites().expect("load"));
    assert_eq!(reloaded.entries()[0].title, "second");
    assert_eq!(reloaded.entries()[1].title, "first");
    assert_eq!(reloaded.entries()[1].id, "1000");
    assert_eq!(
        reloaded.entries()[0].added_at,
        Utc.timestamp_millis_opt(2_000).unwrap()
    );
}

// ── Settings ─────────────────────────────────────────────────────────────────

#[test]
fn test_theme_defaults_to_none() {
    let (db, _dir) = open_temp_db();
    assert_eq!(db.load_theme().expect("load"), None);
}

#[test]
fn test_theme_round_trip() {
    let (db, _dir) = open_temp_db();
    db.save_theme(SkyMode::Day).expect("save");
    assert_eq!(db.load_theme().expect("load"), Some(SkyMode::Day));
    assert_eq!(db.get_setting("theme").expect("get").as_deref(), Some("day"));

    db.save_theme(SkyMode::Night).expect("save");
    assert_eq!(db.load_theme().expect("load"), Some(SkyMode::Night));
}

#[test]
fn test_set_setting_overwrites() {
    let (db, _dir) = open_temp_db();
    db.set_setting("k", "a").expect("set");
    db.set_setting("k", "b").expect("set");
    assert_eq!(db.get_setting("k").expect("get").as_deref(), Some("b"));
    assert_eq!(db.get_setting("missing").expect("get"), None);
}
