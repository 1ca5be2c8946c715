//! ELF reader: turns the bytes of an executable or shared object into an
//! `InputImage` of its `PT_LOAD` segments.
//!
//! Both ELF classes and both byte orders are accepted. Relocatable objects
//! have no program header table and are rejected.

use goblin::elf::header::{EI_CLASS, ELFCLASS32, ELFCLASS64, ELFMAG, SELFMAG};
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::Elf;
use thiserror::Error;

use crate::model::{InputImage, Segment};

/// Error type for reading an input file.
#[derive(Debug, Error)]
pub enum ElfError {
    #[error("{input}: {reason}")]
    MalformedElf { input: String, reason: String },

    #[error(
        "{input}: no program header table found (only ELF executables and shared libraries can be converted, not relocatable object files)"
    )]
    NoProgramHeaderTable { input: String },

    #[error("{input}: unsupported ELF class {class}")]
    UnsupportedElfClass { input: String, class: u8 },

    #[error(
        "{input}: segment at address {address:#x} has p_filesz {file_size:#x} larger than p_memsz {mem_size:#x}"
    )]
    InvalidSegmentSizes { input: String, address: u64, file_size: u64, mem_size: u64 },
}

/// Convenience result type for reading input files.
pub type ElfResult<T> = Result<T, ElfError>;

/// Parse `data` as an ELF file named `source_name`.
pub fn read_image(source_name: impl Into<String>, data: &[u8]) -> ElfResult<InputImage> {
    let input = source_name.into();
    let malformed = |reason: String| ElfError::MalformedElf { input: input.clone(), reason };

    if data.len() < 16 || &data[..SELFMAG] != ELFMAG {
        return Err(malformed("not an ELF file".to_string()));
    }
    let class = data[EI_CLASS];
    if class != ELFCLASS32 && class != ELFCLASS64 {
        return Err(ElfError::UnsupportedElfClass { input, class });
    }

    let elf = Elf::parse(data).map_err(|e| malformed(format!("unable to parse ELF file: {e}")))?;
    if elf.program_headers.is_empty() {
        return Err(ElfError::NoProgramHeaderTable { input });
    }

    let mut segments = Vec::new();
    for phdr in elf.program_headers.iter().filter(|phdr| phdr.p_type == PT_LOAD) {
        let range = phdr
            .p_offset
            .checked_add(phdr.p_filesz)
            .filter(|end| *end <= data.len() as u64)
            .map(|end| phdr.p_offset as usize..end as usize)
            .ok_or_else(|| {
                malformed(format!(
                    "segment at file offset {:#x} with size {:#x} extends past the end of the file",
                    phdr.p_offset, phdr.p_filesz
                ))
            })?;

        let segment = Segment::new(phdr.p_paddr, phdr.p_vaddr, data[range].to_vec(), phdr.p_memsz)
            .map_err(|_| ElfError::InvalidSegmentSizes {
                input: input.clone(),
                address: phdr.p_paddr,
                file_size: phdr.p_filesz,
                mem_size: phdr.p_memsz,
            })?
            .with_file_offset(phdr.p_offset);
        segments.push(segment);
    }

    log::debug!(
        "{input}: {} program header(s), {} loadable, entry {:#x}",
        elf.program_headers.len(),
        segments.len(),
        elf.entry
    );
    Ok(InputImage::new(input, segments, elf.entry))
}
