mod support;

use elf2bin_core::services::encoders::vhx::render;
use elf2bin_core::{convert, BankConfig, OutputMode, OutputSpec};
use support::image;

#[test]
fn render_writes_one_upper_case_byte_per_line() {
    assert_eq!(render(&[0x00, 0xAB, 0x0F, 0xFF]), b"00\nAB\n0F\nFF\n".to_vec());
    assert!(render(&[]).is_empty());
}

#[test]
fn per_segment_vhx() {
    let images = vec![image("a.elf", &[(0x100, &[0xDE, 0xAD]), (0x200, &[0xbe])], 0)];
    let spec =
        OutputSpec::new(OutputMode::VhxPerSegment).with_pattern("%f.%a.vhx").expect("pattern");
    let outputs = convert(&images, &spec).expect("convert");

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].path.to_str(), Some("a.100.vhx"));
    assert_eq!(outputs[0].bytes, b"DE\nAD\n".to_vec());
    assert_eq!(outputs[1].path.to_str(), Some("a.200.vhx"));
    assert_eq!(outputs[1].bytes, b"BE\n".to_vec());
}

#[test]
fn combined_vhx_fills_gaps_with_zero_lines() {
    let images = vec![image("a.elf", &[(0x10, &[0x12]), (0x13, &[0x34])], 0)];
    let spec = OutputSpec::new(OutputMode::VhxCombined).with_output_path("a.vhx").with_base(0xF);
    let outputs = convert(&images, &spec).expect("convert");
    assert_eq!(outputs[0].bytes, b"00\n12\n00\n00\n34\n".to_vec());
}

#[test]
fn banks_split_raw_bytes_before_rendering() {
    let images = vec![image("a.elf", &[(0x0, &[0x00, 0x01, 0x02, 0x03, 0x04, 0x05])], 0)];
    let spec = OutputSpec::new(OutputMode::VhxCombined)
        .with_pattern("%f-%b.vhx")
        .expect("pattern")
        .with_banks(BankConfig::new(1, 2).expect("banks"));
    let outputs = convert(&images, &spec).expect("convert");

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].path.to_str(), Some("a-0.vhx"));
    assert_eq!(outputs[0].bytes, b"00\n02\n04\n".to_vec());
    assert_eq!(outputs[1].path.to_str(), Some("a-1.vhx"));
    assert_eq!(outputs[1].bytes, b"01\n03\n05\n".to_vec());
}
