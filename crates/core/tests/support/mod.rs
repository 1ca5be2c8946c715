//! Shared test fixtures: synthesized input images and hand-built ELF files.
#![allow(dead_code)]

use elf2bin_core::{InputImage, Segment};

pub const PT_LOAD: u32 = 1;
pub const PT_NOTE: u32 = 4;

/// Input image made of segments that carry no zero-initialized tail.
pub fn image(name: &str, segments: &[(u64, &[u8])], entry_point: u64) -> InputImage {
    let segments = segments
        .iter()
        .map(|(address, data)| Segment::with_data(*address, data.to_vec()))
        .collect();
    InputImage::new(name, segments, entry_point)
}

/// `count` consecutive byte values starting at `first`.
pub fn ramp(first: u8, count: usize) -> Vec<u8> {
    (0..count).map(|i| first.wrapping_add(i as u8)).collect()
}

/// Output of an encoder as text lines.
pub fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8(bytes.to_vec()).expect("utf-8 output").lines().map(str::to_string).collect()
}

/// One program header of a hand-built ELF file.
#[derive(Debug, Clone)]
pub struct SegmentDesc {
    pub p_type: u32,
    pub paddr: u64,
    pub vaddr: u64,
    pub data: Vec<u8>,
    /// Extra bytes of memory beyond the file contents.
    pub zero_fill: u64,
}

impl SegmentDesc {
    pub fn load(address: u64, data: impl Into<Vec<u8>>) -> Self {
        Self { p_type: PT_LOAD, paddr: address, vaddr: address, data: data.into(), zero_fill: 0 }
    }

    pub fn with_vaddr(mut self, vaddr: u64) -> Self {
        self.vaddr = vaddr;
        self
    }

    pub fn with_zero_fill(mut self, zero_fill: u64) -> Self {
        self.zero_fill = zero_fill;
        self
    }

    pub fn with_type(mut self, p_type: u32) -> Self {
        self.p_type = p_type;
        self
    }
}

/// ELF class and byte order of a hand-built file.
#[derive(Debug, Clone, Copy)]
pub struct ElfLayout {
    pub sixty_four: bool,
    pub big_endian: bool,
}

impl ElfLayout {
    pub const ELF32_LE: ElfLayout = ElfLayout { sixty_four: false, big_endian: false };
    pub const ELF32_BE: ElfLayout = ElfLayout { sixty_four: false, big_endian: true };
    pub const ELF64_LE: ElfLayout = ElfLayout { sixty_four: true, big_endian: false };
    pub const ELF64_BE: ElfLayout = ElfLayout { sixty_four: true, big_endian: true };

    fn header_size(&self) -> usize {
        if self.sixty_four {
            64
        } else {
            52
        }
    }

    fn phdr_size(&self) -> usize {
        if self.sixty_four {
            56
        } else {
            32
        }
    }
}

struct Writer {
    layout: ElfLayout,
    bytes: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    fn u16(&mut self, value: u16) {
        if self.layout.big_endian {
            self.bytes.extend_from_slice(&value.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn u32(&mut self, value: u32) {
        if self.layout.big_endian {
            self.bytes.extend_from_slice(&value.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn u64(&mut self, value: u64) {
        if self.layout.big_endian {
            self.bytes.extend_from_slice(&value.to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    /// Address-sized field: 4 bytes for ELF32, 8 for ELF64.
    fn word(&mut self, value: u64) {
        if self.layout.sixty_four {
            self.u64(value);
        } else {
            self.u32(value as u32);
        }
    }
}

/// Build an executable ELF file with the given program headers. Segment
/// contents follow the program header table in order.
pub fn make_elf(layout: ElfLayout, segments: &[SegmentDesc], entry: u64) -> Vec<u8> {
    let phoff = if segments.is_empty() { 0 } else { layout.header_size() };
    let mut data_offset = layout.header_size() + layout.phdr_size() * segments.len();

    let mut w = Writer { layout, bytes: Vec::new() };
    w.bytes.extend_from_slice(b"\x7fELF");
    w.u8(if layout.sixty_four { 2 } else { 1 });
    w.u8(if layout.big_endian { 2 } else { 1 });
    w.u8(1); // EI_VERSION
    w.bytes.resize(16, 0);

    w.u16(2); // ET_EXEC
    w.u16(if layout.sixty_four { 183 } else { 40 });
    w.u32(1);
    w.word(entry);
    w.word(phoff as u64);
    w.word(0); // e_shoff
    w.u32(0); // e_flags
    w.u16(layout.header_size() as u16);
    w.u16(layout.phdr_size() as u16);
    w.u16(segments.len() as u16);
    w.u16(if layout.sixty_four { 64 } else { 40 });
    w.u16(0); // e_shnum
    w.u16(0); // e_shstrndx
    assert_eq!(w.bytes.len(), layout.header_size());

    for segment in segments {
        let filesz = segment.data.len() as u64;
        let memsz = filesz + segment.zero_fill;
        if layout.sixty_four {
            w.u32(segment.p_type);
            w.u32(5); // PF_R | PF_X
            w.u64(data_offset as u64);
            w.u64(segment.vaddr);
            w.u64(segment.paddr);
            w.u64(filesz);
            w.u64(memsz);
            w.u64(4);
        } else {
            w.u32(segment.p_type);
            w.u32(data_offset as u32);
            w.u32(segment.vaddr as u32);
            w.u32(segment.paddr as u32);
            w.u32(filesz as u32);
            w.u32(memsz as u32);
            w.u32(5);
            w.u32(4);
        }
        data_offset += segment.data.len();
    }

    for segment in segments {
        w.bytes.extend_from_slice(&segment.data);
    }
    w.bytes
}

/// Little-endian ELF32, the common case for embedded targets.
pub fn make_elf32(segments: &[SegmentDesc], entry: u64) -> Vec<u8> {
    make_elf(ElfLayout::ELF32_LE, segments, entry)
}
