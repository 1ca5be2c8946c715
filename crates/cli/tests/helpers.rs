use elf2bin::commands::{build_output_spec, ConvertOptions};
use elf2bin::{parse_address, sha256_bytes};
use elf2bin_core::config::{AddressValue, ConversionConfig};
use elf2bin_core::{AddressKind, OutputMode};

#[test]
fn sha256_bytes_matches_known_digest() {
    assert_eq!(
        sha256_bytes(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn parse_address_is_reexported() {
    assert_eq!(parse_address("0x8000"), Ok(0x8000));
}

#[test]
fn options_override_config() {
    let config = ConversionConfig {
        mode: Some(OutputMode::BinCombined),
        output_pattern: Some("%f.bin".to_string()),
        base: Some(AddressValue::Text("0x100".to_string())),
        banks: Some("2x2".to_string()),
        datareclen: Some(8),
        zi: Some(true),
        addresses: Some(AddressKind::Virtual),
        entry_point_record: Some(false),
        ..ConversionConfig::default()
    };

    let spec = build_output_spec(&ConvertOptions::default(), &config).expect("spec from config");
    assert_eq!(spec.mode, OutputMode::BinCombined);
    assert_eq!(spec.name_pattern.as_ref().map(|p| p.as_str()), Some("%f.bin"));
    assert_eq!(spec.base_override, Some(0x100));
    assert_eq!(spec.bank.map(|b| b.to_string()), Some("2x2".to_string()));
    assert_eq!(spec.record_length, 8);
    assert!(spec.include_zero_init);
    assert!(spec.use_virtual_address);
    assert!(!spec.entry_point_record);

    let opts = ConvertOptions {
        mode: Some(OutputMode::IntelHex),
        output: Some("out.hex".into()),
        base: Some(0x200),
        banks: Some("1x4".to_string()),
        datareclen: Some(32),
        zi: Some(false),
        addresses: Some(AddressKind::Physical),
        entry_point_record: Some(true),
        ..ConvertOptions::default()
    };
    let spec = build_output_spec(&opts, &config).expect("spec from options");
    assert_eq!(spec.mode, OutputMode::IntelHex);
    assert_eq!(spec.single_output_path.as_deref(), Some(std::path::Path::new("out.hex")));
    assert!(spec.name_pattern.is_none(), "-o replaces the config pattern");
    assert_eq!(spec.base_override, Some(0x200));
    assert_eq!(spec.bank.map(|b| b.count()), Some(4));
    assert_eq!(spec.record_length, 32);
    assert!(!spec.use_virtual_address);
    assert!(!spec.include_zero_init, "zi: Some(false) overrides the config");
    assert!(spec.entry_point_record, "entry_point_record: Some(true) overrides the config");
}

#[test]
fn defaults_without_config() {
    let opts = ConvertOptions {
        mode: Some(OutputMode::IntelHex),
        output: Some("out.hex".into()),
        ..ConvertOptions::default()
    };
    let spec = build_output_spec(&opts, &ConversionConfig::default()).expect("spec");
    assert_eq!(spec.record_length, 16);
    assert!(spec.entry_point_record);
    assert!(!spec.include_zero_init);
    assert_eq!(spec.address_kind(), AddressKind::Physical);
    assert!(spec.bank.is_none() && spec.address_filter.is_none());

    let opts = ConvertOptions { entry_point_record: Some(false), ..opts };
    let spec = build_output_spec(&opts, &ConversionConfig::default()).expect("spec");
    assert!(!spec.entry_point_record);
}

#[test]
fn invalid_values_are_reported() {
    let opts = ConvertOptions {
        mode: Some(OutputMode::BinCombined),
        output: Some("out.bin".into()),
        banks: Some("2by4".to_string()),
        ..ConvertOptions::default()
    };
    let err = build_output_spec(&opts, &ConversionConfig::default()).unwrap_err();
    assert!(err.to_string().contains("invalid bank configuration '2by4'"), "{err}");

    let opts = ConvertOptions {
        mode: Some(OutputMode::BinCombined),
        output_pattern: Some("%q".to_string()),
        ..ConvertOptions::default()
    };
    let err = build_output_spec(&opts, &ConversionConfig::default()).unwrap_err();
    assert!(err.to_string().contains("invalid directive '%q'"), "{err}");

    let err =
        build_output_spec(&ConvertOptions::default(), &ConversionConfig::default()).unwrap_err();
    assert!(err.to_string().contains("--ihex, --srec, --bin"), "{err}");
}
