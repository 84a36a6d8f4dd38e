//! Output naming tests: collision policy, determinism and format choice.

use sheet_redactor::output::{OutputNamer, SaveFormat, DEFAULT_SUFFIX};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_reference_collision_sequence() {
    let dir = TempDir::new().unwrap();
    let namer = OutputNamer::default();

    fs::write(dir.path().join("card.xlsx"), b"").unwrap();
    assert_eq!(
        namer.resolve(dir.path(), Path::new("card.xlsx")),
        dir.path().join("card__anon.xlsx")
    );

    fs::write(dir.path().join("card__anon.xlsx"), b"").unwrap();
    assert_eq!(
        namer.resolve(dir.path(), Path::new("card.xlsx")),
        dir.path().join("card__anon_1.xlsx")
    );
}

#[test]
fn test_counter_keeps_climbing() {
    let dir = TempDir::new().unwrap();
    let namer = OutputNamer::default();
    let source = Path::new("card.xls");

    let mut produced = Vec::new();
    for _ in 0..6 {
        let path = namer.resolve(dir.path(), source);
        assert!(!path.exists());
        fs::write(&path, b"").unwrap();
        produced.push(path.file_name().unwrap().to_string_lossy().into_owned());
    }

    assert_eq!(
        produced,
        vec![
            "card.xls",
            "card__anon.xls",
            "card__anon_1.xls",
            "card__anon_2.xls",
            "card__anon_3.xls",
            "card__anon_4.xls",
        ]
    );
}

#[test]
fn test_gap_in_counter_is_reused() {
    let dir = TempDir::new().unwrap();
    for name in ["card.xls", "card__anon.xls", "card__anon_2.xls"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }

    let path = OutputNamer::default().resolve(dir.path(), Path::new("card.xls"));
    assert_eq!(path, dir.path().join("card__anon_1.xls"));
}

#[test]
fn test_resolve_is_deterministic_and_side_effect_free() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("card.xlsx"), b"").unwrap();
    let namer = OutputNamer::default();

    let first = namer.resolve(dir.path(), Path::new("card.xlsx"));
    let second = namer.resolve(dir.path(), Path::new("card.xlsx"));

    assert_eq!(first, second);
    assert!(!first.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_custom_suffix() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("card.xlsx"), b"").unwrap();

    let path = OutputNamer::new("_redacted").resolve(dir.path(), Path::new("card.xlsx"));
    assert_eq!(path, dir.path().join("card_redacted.xlsx"));
    assert_eq!(OutputNamer::default().suffix(), DEFAULT_SUFFIX);
}

#[test]
fn test_only_file_name_of_source_matters() {
    let dir = TempDir::new().unwrap();
    let path = OutputNamer::default().resolve(dir.path(), Path::new("Зарплата март.xls"));
    assert_eq!(path, dir.path().join("Зарплата март.xls"));
}

#[test]
fn test_format_from_destination_only() {
    assert_eq!(SaveFormat::for_path(Path::new("out/card.xlsx")), SaveFormat::OpenXml);
    assert_eq!(SaveFormat::for_path(Path::new("out/card__anon_3.xls")), SaveFormat::LegacyBinary);
    assert_eq!(SaveFormat::for_path(Path::new("out/card.ods")), SaveFormat::LegacyBinary);
}
