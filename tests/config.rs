// Config defaults and TOML parsing.

use skyplayer::config::Config;

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.general.frame_rate, 30.0);
    assert_eq!(config.general.default_volume, 1.0);
    assert_eq!(config.general.skip_seconds, 10.0);
    assert_eq!(config.general.example_urls.len(), 3);
    assert_eq!(config.sky.drops_per_cloud, 4);
    assert_eq!(config.sky.meteor_count, 5);
    assert!(config.sky.emoji);
}

#[test]
fn test_config_parse_toml() {
    let toml_str = r#"
        [general]
        frame_rate = 20.0
        skip_seconds = 5.0
        example_urls = ["https://a.test/x.mp3"]

        [sky]
        drops_per_cloud = 6
        emoji = false
    "#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.general.frame_rate, 20.0);
    assert_eq!(config.general.skip_seconds, 5.0);
    assert_eq!(config.general.example_urls, vec!["https://a.test/x.mp3".to_string()]);
    assert_eq!(config.general.default_volume, 1.0);
    assert_eq!(config.sky.drops_per_cloud, 6);
    assert_eq!(config.sky.meteor_count, 5);
    assert!(!config.sky.emoji);
}

#[test]
fn test_config_empty_file_uses_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.general.frame_rate, 30.0);
    assert_eq!(config.sky.meteor_count, 5);
}

#[test]
fn test_config_path_is_under_skyplayer() {
    let path = Config::config_path();
    assert!(path.ends_with("skyplayer/config.toml"));
}
