//! Configuration loading and validation.

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use visionary::config::{load_config, load_config_or_default, validate_config, Config};

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("visionary.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.library.extensions, vec!["mkv"]);
    assert!(config.library.root.is_none());
    assert_eq!(config.selection.preferred_language, "eng");
    assert!(config.remux.extract_video);
    assert!(config.remux.extract_audio);
    assert_eq!(config.remux.default_language, "eng");
    assert!(!config.scan.parallel);
    validate_config(&config).unwrap();
}

#[test]
fn load_full_config() {
    let (_dir, path) = write_config(
        r#"
[library]
root = "/media/movies"
extensions = ["mkv", "mp4"]

[selection]
preferred_language = "jpn"

[remux]
output_dir = "/media/extracted"
extract_audio = false

[scan]
parallel = true

[tools]
ffprobe_path = "/opt/ffmpeg/bin/ffprobe"
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.library.root, Some(PathBuf::from("/media/movies")));
    assert_eq!(config.library.extensions, vec!["mkv", "mp4"]);
    assert!(config.scan.parallel);
    assert_eq!(
        config.tools.ffprobe_path,
        Some(PathBuf::from("/opt/ffmpeg/bin/ffprobe"))
    );
    assert!(config.tools.ffmpeg_path.is_none());

    let policy = config.selection.to_policy();
    assert_eq!(policy.preferred_language, "jpn");

    let options = config.remux.to_plan_options();
    assert!(options.extract_video);
    assert!(!options.extract_audio);
    assert_eq!(options.output_dir, Some(PathBuf::from("/media/extracted")));
    assert_eq!(options.default_language, "eng");
}

#[test]
fn partial_config_fills_defaults() {
    let (_dir, path) = write_config("[scan]\nparallel = true\n");
    let config = load_config(&path).unwrap();
    assert_eq!(config.library.extensions, vec!["mkv"]);
    assert_eq!(config.selection.preferred_language, "eng");
}

#[test]
fn rejects_empty_extensions() {
    let (_dir, path) = write_config("[library]\nextensions = []\n");
    assert!(load_config(&path).is_err());

    let (_dir, path) = write_config("[library]\nextensions = [\".\", \" \"]\n");
    assert!(load_config(&path).is_err());
}

#[test]
fn rejects_empty_language() {
    let (_dir, path) = write_config("[selection]\npreferred_language = \"\"\n");
    assert!(load_config(&path).is_err());

    let (_dir, path) = write_config("[remux]\ndefault_language = \" \"\n");
    assert!(load_config(&path).is_err());
}

#[test]
fn rejects_nothing_to_extract() {
    let (_dir, path) = write_config("[remux]\nextract_video = false\nextract_audio = false\n");
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("at least one"));
}

#[test]
fn rejects_invalid_toml() {
    let (_dir, path) = write_config("[library\nroot = ");
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempdir().unwrap();
    assert!(load_config_or_default(Some(&dir.path().join("missing.toml"))).is_err());
}
