//! Container header parsing and little-endian field helpers.

use crate::error::{ContainerError, Result};

/// Compound document signature.
pub const SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Length of the fixed header block.
pub const HEADER_LEN: usize = 512;

/// Number of FAT sector locations stored inline in the header.
pub const HEADER_DIFAT_ENTRIES: usize = 109;

/// Directory entry length.
pub const DIRECTORY_ENTRY_LEN: usize = 128;

/// Highest regular sector number.
pub const MAX_REGULAR_SECTOR: u32 = 0xFFFF_FFFA;
/// Marks a sector holding DIFAT entries.
pub const DIFAT_SECTOR: u32 = 0xFFFF_FFFC;
/// Marks a sector holding FAT entries.
pub const FAT_SECTOR: u32 = 0xFFFF_FFFD;
/// Terminates a sector chain.
pub const END_OF_CHAIN: u32 = 0xFFFF_FFFE;
/// Unallocated sector.
pub const FREE_SECTOR: u32 = 0xFFFF_FFFF;
/// Absent directory sibling or child.
pub const NO_STREAM: u32 = 0xFFFF_FFFF;

/// Streams shorter than this live in the mini stream.
pub const MINI_STREAM_CUTOFF: u32 = 4096;

const BYTE_ORDER_MARK: u16 = 0xFFFE;

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub major_version: u16,
    pub sector_shift: u16,
    pub mini_sector_shift: u16,
    pub fat_sector_count: u32,
    pub first_directory_sector: u32,
    pub mini_stream_cutoff: u32,
    pub first_mini_fat_sector: u32,
    pub mini_fat_sector_count: u32,
    pub first_difat_sector: u32,
    pub difat_sector_count: u32,
    /// FAT sector locations from the header, free slots removed.
    pub difat: Vec<u32>,
}

impl Header {
    /// Parse the 512-byte header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let block = slice(data, 0, HEADER_LEN)?;
        if block[..8] != SIGNATURE {
            return Err(ContainerError::BadSignature);
        }
        if read_u16(block, 28)? != BYTE_ORDER_MARK {
            return Err(ContainerError::invalid_header("byte order mark is not little-endian"));
        }

        let major_version = read_u16(block, 26)?;
        let sector_shift = read_u16(block, 30)?;
        match (major_version, sector_shift) {
            (3, 9) | (4, 12) => {}
            (3 | 4, shift) => return Err(ContainerError::UnsupportedSectorSize { shift }),
            (version, _) => {
                return Err(ContainerError::invalid_header(format!(
                    "unknown major version {version}"
                )));
            }
        }
        let mini_sector_shift = read_u16(block, 32)?;
        if mini_sector_shift != 6 {
            return Err(ContainerError::invalid_header(format!(
                "mini sector shift {mini_sector_shift}, expected 6"
            )));
        }

        let difat = (0..HEADER_DIFAT_ENTRIES)
            .map(|i| read_u32(block, 76 + i * 4))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|&sector| sector <= MAX_REGULAR_SECTOR)
            .collect();

        Ok(Self {
            major_version,
            sector_shift,
            mini_sector_shift,
            fat_sector_count: read_u32(block, 44)?,
            first_directory_sector: read_u32(block, 48)?,
            mini_stream_cutoff: read_u32(block, 56)?,
            first_mini_fat_sector: read_u32(block, 60)?,
            mini_fat_sector_count: read_u32(block, 64)?,
            first_difat_sector: read_u32(block, 68)?,
            difat_sector_count: read_u32(block, 72)?,
            difat,
        })
    }

    /// Size of a regular sector in bytes.
    #[must_use]
    pub const fn sector_size(&self) -> usize {
        1 << self.sector_shift
    }

    /// Size of a mini stream sector in bytes.
    #[must_use]
    pub const fn mini_sector_size(&self) -> usize {
        1 << self.mini_sector_shift
    }

    /// FAT entries held by one sector.
    #[must_use]
    pub const fn entries_per_sector(&self) -> usize {
        self.sector_size() / 4
    }
}

/// Bounded slice read.
pub(crate) fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ContainerError::Truncated {
            offset,
            needed: len,
            actual: data.len(),
        })
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = slice(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = slice(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let low = u64::from(read_u32(data, offset)?);
    let high = u64::from(read_u32(data, offset + 4)?);
    Ok(low | (high << 32))
}
