//! Integration tests for the generate command.
//!
//! These drive the command layer end to end against scratch directories; no
//! test enables playback.

use datasong_cli::commands::generate::{generate, GenerateOverrides};
use datasong_cli::commands::{exit_status, EXIT_CONFIG_ERROR, EXIT_FAILURE};
use datasong_core::SourceConfig;
use midly::Smf;
use pretty_assertions::assert_eq;
use std::path::Path;

fn overrides_for(output: &Path, source: SourceConfig) -> GenerateOverrides {
    GenerateOverrides {
        output: Some(output.to_path_buf()),
        source: Some(source),
        ..Default::default()
    }
}

#[test]
fn test_random_generation_reports_hash_and_seed() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("random.mid");

    let report = generate(
        None,
        GenerateOverrides {
            seed: Some(31),
            number_of_tracks: Some(2),
            notes_limit: Some(16),
            ..overrides_for(&output, SourceConfig::Random)
        },
    )
    .unwrap();

    assert_eq!(report.seed, 31);
    assert_eq!(report.source, "random");
    assert_eq!(report.tracks, 2);
    assert!(!report.played);

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(report.hash, blake3::hash(&bytes).to_hex().to_string());

    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 2);
    assert!(smf.tracks.iter().all(|track| track.len() == 33));
}

#[test]
fn test_same_seed_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.mid");
    let second = dir.path().join("b.mid");

    let a = generate(
        None,
        GenerateOverrides {
            seed: Some(5),
            ..overrides_for(&first, SourceConfig::default())
        },
    )
    .unwrap();
    let b = generate(
        None,
        GenerateOverrides {
            seed: Some(5),
            ..overrides_for(&second, SourceConfig::default())
        },
    )
    .unwrap();

    assert_eq!(a.hash, b.hash);
}

#[test]
fn test_text_generation() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("poem.txt");
    std::fs::write(&text, "so much depends\nupon\n").unwrap();
    let output = dir.path().join("poem.mid");

    let report = generate(
        None,
        GenerateOverrides {
            notes_limit: Some(10),
            ..overrides_for(&output, SourceConfig::Text { path: text })
        },
    )
    .unwrap();
    assert_eq!(report.source, "text");
    assert!(output.exists());
}

#[test]
fn test_image_generation() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("gradient.png");
    image::RgbImage::from_fn(16, 16, |x, y| image::Rgb([(x * 16) as u8, (y * 16) as u8, 128]))
        .save(&image_path)
        .unwrap();
    let output = dir.path().join("gradient.mid");

    let report = generate(
        None,
        GenerateOverrides {
            number_of_tracks: Some(3),
            ..overrides_for(&output, SourceConfig::Image { path: image_path })
        },
    )
    .unwrap();
    assert_eq!(report.source, "image");
    assert_eq!(report.notes_per_track, 70);
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(Smf::parse(&bytes).unwrap().tracks.len(), 3);
}

#[test]
fn test_config_file_with_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("from_config.mid");
    let config_path = dir.path().join("song.json");
    let config = serde_json::json!({
        "output": output,
        "notes_limit": 8,
        "number_of_tracks": 2,
        "source": { "kind": "random" },
        "seed": 77
    });
    std::fs::write(&config_path, config.to_string()).unwrap();

    let report = generate(
        Some(&config_path),
        GenerateOverrides {
            number_of_tracks: Some(4),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(report.output, output);
    assert_eq!(report.seed, 77);
    assert_eq!(report.tracks, 4);
    assert_eq!(report.notes_per_track, 8);
}

#[test]
fn test_zero_tracks_exits_two_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.mid");

    let err = generate(
        None,
        GenerateOverrides {
            number_of_tracks: Some(0),
            ..overrides_for(&output, SourceConfig::Random)
        },
    )
    .unwrap_err();

    assert_eq!(exit_status(&err), EXIT_CONFIG_ERROR);
    assert!(!output.exists());
}

#[test]
fn test_unknown_config_field_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("bad.json");
    std::fs::write(&config_path, r#"{ "tempo": 120 }"#).unwrap();

    let err = generate(Some(&config_path), GenerateOverrides::default()).unwrap_err();
    assert_eq!(exit_status(&err), EXIT_CONFIG_ERROR);
}

#[test]
fn test_missing_text_source_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.mid");

    let err = generate(
        None,
        overrides_for(
            &output,
            SourceConfig::Text {
                path: dir.path().join("missing.txt"),
            },
        ),
    )
    .unwrap_err();

    assert_eq!(exit_status(&err), EXIT_FAILURE);
    assert!(!output.exists());
}

#[test]
fn test_source_shorter_than_notes_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("tiny.png");
    image::RgbImage::new(2, 2).save(&image_path).unwrap();
    let output = dir.path().join("tiny.mid");

    let err = generate(
        None,
        GenerateOverrides {
            notes_limit: Some(5),
            ..overrides_for(&output, SourceConfig::Image { path: image_path })
        },
    )
    .unwrap_err();

    assert_eq!(exit_status(&err), EXIT_FAILURE);
    assert!(!output.exists());
}
