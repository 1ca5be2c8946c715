use std::path::{Path, PathBuf};

use elf2bin_core::services::naming::{check_duplicates, normalize_path, NamePattern};
use elf2bin_core::{ArtifactKey, ConversionError, ResolvedOutput};

fn expand(pattern: &str, key: &ArtifactKey) -> PathBuf {
    NamePattern::parse(pattern).expect("pattern").expand(key).expect("expand")
}

fn output(path: &str, key: ArtifactKey) -> ResolvedOutput {
    ResolvedOutput { path: PathBuf::from(path), key, bytes: Vec::new() }
}

#[test]
fn file_directives_strip_directory_and_extension() {
    let key = ArtifactKey::image("./build/input.elf");
    assert_eq!(expand("%f.hex", &key), Path::new("input.hex"));
    assert_eq!(expand("%F.hex", &key), Path::new("input.elf.hex"));
    assert_eq!(expand("out/%f", &key), Path::new("out/input"));

    let bare = ArtifactKey::image("firmware");
    assert_eq!(expand("%f.bin", &bare), Path::new("firmware.bin"));
}

#[test]
fn address_directives_use_minimal_hex() {
    let key = ArtifactKey::segment("a.elf", 0x8000_ABCD);
    assert_eq!(expand("%a", &key), Path::new("8000abcd"));
    assert_eq!(expand("%A", &key), Path::new("8000ABCD"));
    assert_eq!(expand("%a", &ArtifactKey::segment("a.elf", 0)), Path::new("0"));
}

#[test]
fn bank_and_percent_directives() {
    let key = ArtifactKey::segment("a.elf", 0x10).with_bank(12);
    assert_eq!(expand("%f-%a-%b.bin", &key), Path::new("a-10-12.bin"));
    assert_eq!(expand("100%%-%b", &key), Path::new("100%-12"));
    assert_eq!(expand("%%f", &key), Path::new("%f"));
}

#[test]
fn unknown_or_unterminated_directives_are_rejected() {
    for (pattern, directive) in [("%x.bin", "%x"), ("out%", "%"), ("%f%", "%")] {
        let err = NamePattern::parse(pattern).unwrap_err();
        match err {
            ConversionError::InvalidPatternDirective { pattern: p, directive: d, .. } => {
                assert_eq!(p, pattern);
                assert_eq!(d, directive);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn pattern_reports_which_fields_it_needs() {
    let pattern = NamePattern::parse("%f-%A-%b").expect("pattern");
    assert!(pattern.uses_address());
    assert!(pattern.uses_bank());
    assert_eq!(pattern.to_string(), "%f-%A-%b");
    assert!(pattern.check_fields(true, true).is_ok());

    let err = pattern.check_fields(false, true).unwrap_err();
    assert!(err.to_string().contains("invalid directive '%A'"), "{err}");
    let err = pattern.check_fields(true, false).unwrap_err();
    assert!(err.to_string().contains("invalid directive '%b'"), "{err}");

    let plain = NamePattern::parse("%f.bin").expect("pattern");
    assert!(!plain.uses_address() && !plain.uses_bank());
    assert!(plain.check_fields(false, false).is_ok());
}

#[test]
fn expanding_a_missing_field_fails() {
    let pattern = NamePattern::parse("%a.bin").expect("pattern");
    let err = pattern.expand(&ArtifactKey::image("a.elf")).unwrap_err();
    assert_eq!(err.kind(), "invalid_pattern_directive");
}

#[test]
fn normalization_is_lexical() {
    assert_eq!(normalize_path(Path::new("./out.bin")), Path::new("out.bin"));
    assert_eq!(normalize_path(Path::new("out//./x.bin")), Path::new("out/x.bin"));
    assert_eq!(normalize_path(Path::new("a/../b.bin")), Path::new("a/../b.bin"));
    assert_eq!(normalize_path(Path::new(".")), Path::new("."));
}

#[test]
fn duplicates_are_detected_after_normalization() {
    let first = ArtifactKey::segment("a.elf", 0x8000);
    let second = ArtifactKey::segment("a.elf", 0x9000);
    let outputs = vec![output("./a.bin", first.clone()), output("a.bin", second.clone())];

    let err = check_duplicates(&outputs).unwrap_err();
    match &err {
        ConversionError::DuplicateOutputPath { path, first: f, second: s } => {
            assert_eq!(path, Path::new("a.bin"));
            assert_eq!(f, &first);
            assert_eq!(s, &second);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "output file 'a.bin' would be written more than once by this command \
         (a.elf segment 0x8000; a.elf segment 0x9000)"
    );
}

#[test]
fn case_differences_are_distinct_paths() {
    let outputs = vec![
        output("A.bin", ArtifactKey::image("A.elf")),
        output("a.bin", ArtifactKey::image("a.elf")),
    ];
    assert!(check_duplicates(&outputs).is_ok());
}
