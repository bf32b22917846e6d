//! Sector allocation tables and chain walking.

use crate::error::{ChainFault, ContainerError, Result};
use crate::header::{END_OF_CHAIN, Header, MAX_REGULAR_SECTOR, read_u32};

/// A FAT or mini FAT: `entries[n]` is the sector following sector `n`.
#[derive(Debug, Clone, Default)]
pub(crate) struct AllocationTable {
    entries: Vec<u32>,
}

impl AllocationTable {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        let entries = bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Self { entries }
    }

    /// Follow the chain beginning at `start`.
    ///
    /// `available` is the number of sectors that physically exist; any link
    /// at or beyond it is rejected, as is any sector visited twice.
    pub(crate) fn chain(&self, start: u32, available: usize) -> Result<Vec<u32>> {
        let mut chain = Vec::new();
        let mut visited = vec![false; self.entries.len()];
        let mut current = start;
        while current != END_OF_CHAIN {
            if current > MAX_REGULAR_SECTOR {
                return Err(ContainerError::corrupt_chain(
                    start,
                    ChainFault::Unallocated { sector: current },
                ));
            }
            let index = current as usize;
            if index >= available || index >= self.entries.len() {
                return Err(ContainerError::corrupt_chain(
                    start,
                    ChainFault::OutOfRange { sector: current },
                ));
            }
            if visited[index] {
                return Err(ContainerError::corrupt_chain(
                    start,
                    ChainFault::Cycle { sector: current },
                ));
            }
            visited[index] = true;
            chain.push(current);
            current = self.entries[index];
        }
        Ok(chain)
    }
}

/// Regular sector geometry of a container buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sectors<'a> {
    data: &'a [u8],
    size: usize,
}

impl<'a> Sectors<'a> {
    pub(crate) fn new(data: &'a [u8], header: &Header) -> Self {
        Self {
            data,
            size: header.sector_size(),
        }
    }

    /// Sectors present in the buffer; the last one may be short.
    pub(crate) fn count(&self) -> usize {
        self.data.len().saturating_sub(self.size).div_ceil(self.size)
    }

    pub(crate) fn get(&self, sector: u32) -> Option<&'a [u8]> {
        let start = (sector as usize).checked_add(1)?.checked_mul(self.size)?;
        let end = start.checked_add(self.size)?.min(self.data.len());
        self.data.get(start..end)
    }

    /// Concatenate a chain, truncated to `size` bytes when given.
    pub(crate) fn read_chain(&self, start: u32, chain: &[u32], size: Option<u64>) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(chain.len() * self.size);
        for &sector in chain {
            let bytes = self.get(sector).ok_or(ContainerError::corrupt_chain(
                start,
                ChainFault::OutOfRange { sector },
            ))?;
            out.extend_from_slice(bytes);
        }
        truncate_to(&mut out, start, size)?;
        Ok(out)
    }
}

/// Concatenate a mini FAT chain out of the mini stream.
pub(crate) fn read_mini_chain(
    mini_stream: &[u8],
    mini_sector_size: usize,
    start: u32,
    chain: &[u32],
    size: u64,
) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(chain.len() * mini_sector_size);
    for &sector in chain {
        let offset = sector as usize * mini_sector_size;
        let end = (offset + mini_sector_size).min(mini_stream.len());
        let bytes = mini_stream.get(offset..end).ok_or(ContainerError::corrupt_chain(
            start,
            ChainFault::OutOfRange { sector },
        ))?;
        out.extend_from_slice(bytes);
    }
    truncate_to(&mut out, start, Some(size))?;
    Ok(out)
}

fn truncate_to(out: &mut Vec<u8>, start: u32, size: Option<u64>) -> Result<()> {
    if let Some(size) = size {
        if (out.len() as u64) < size {
            return Err(ContainerError::corrupt_chain(
                start,
                ChainFault::TooShort {
                    expected: size,
                    actual: out.len() as u64,
                },
            ));
        }
        out.truncate(size as usize);
    }
    Ok(())
}

/// Collect the FAT sector list (header DIFAT plus DIFAT sector chain) and
/// load the FAT.
pub(crate) fn load_fat(sectors: &Sectors<'_>, header: &Header) -> Result<AllocationTable> {
    let mut fat_sectors = header.difat.clone();
    let per_sector = header.entries_per_sector();

    let mut next = header.first_difat_sector;
    let mut seen = Vec::new();
    for _ in 0..header.difat_sector_count {
        if next == END_OF_CHAIN || next > MAX_REGULAR_SECTOR {
            break;
        }
        if seen.contains(&next) {
            return Err(ContainerError::corrupt_chain(
                header.first_difat_sector,
                ChainFault::Cycle { sector: next },
            ));
        }
        seen.push(next);
        let block = sectors.get(next).ok_or(ContainerError::corrupt_chain(
            header.first_difat_sector,
            ChainFault::OutOfRange { sector: next },
        ))?;
        for i in 0..per_sector - 1 {
            let sector = read_u32(block, i * 4)?;
            if sector <= MAX_REGULAR_SECTOR {
                fat_sectors.push(sector);
            }
        }
        next = read_u32(block, (per_sector - 1) * 4)?;
    }

    if fat_sectors.len() < header.fat_sector_count as usize {
        return Err(ContainerError::invalid_header(format!(
            "header declares {} FAT sectors, found {}",
            header.fat_sector_count,
            fat_sectors.len()
        )));
    }
    fat_sectors.truncate(header.fat_sector_count as usize);

    let mut bytes = Vec::with_capacity(fat_sectors.len() * header.sector_size());
    for &sector in &fat_sectors {
        let block = sectors.get(sector).ok_or(ContainerError::corrupt_chain(
            sector,
            ChainFault::OutOfRange { sector },
        ))?;
        bytes.extend_from_slice(block);
    }
    Ok(AllocationTable::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::FREE_SECTOR;

    fn table(entries: &[u32]) -> AllocationTable {
        let bytes: Vec<u8> = entries.iter().flat_map(|e| e.to_le_bytes()).collect();
        AllocationTable::from_bytes(&bytes)
    }

    #[test]
    fn test_chain_follows_links() {
        let fat = table(&[2, END_OF_CHAIN, 1, FREE_SECTOR]);
        assert_eq!(fat.chain(0, 4).expect("chain"), vec![0, 2, 1]);
        assert!(fat.chain(3, 4).is_err());
    }

    #[test]
    fn test_chain_rejects_cycle() {
        let fat = table(&[1, 0]);
        let err = fat.chain(0, 2).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::CorruptSectorChain {
                start: 0,
                fault: ChainFault::Cycle { sector: 0 }
            }
        ));
    }

    #[test]
    fn test_chain_rejects_sector_past_end_of_file() {
        let fat = table(&[7, END_OF_CHAIN, END_OF_CHAIN, END_OF_CHAIN, 0, 0, 0, 0]);
        let err = fat.chain(0, 4).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::CorruptSectorChain {
                fault: ChainFault::OutOfRange { sector: 7 },
                ..
            }
        ));
    }

    #[test]
    fn test_chain_rejects_free_marker() {
        let fat = table(&[FREE_SECTOR]);
        assert!(matches!(
            fat.chain(0, 1),
            Err(ContainerError::CorruptSectorChain {
                fault: ChainFault::Unallocated { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_empty_chain() {
        let fat = table(&[]);
        assert!(fat.chain(END_OF_CHAIN, 0).expect("chain").is_empty());
    }

    #[test]
    fn test_mini_chain_too_short() {
        let mini = vec![0u8; 64];
        let err = read_mini_chain(&mini, 64, 0, &[0], 100).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::CorruptSectorChain {
                fault: ChainFault::TooShort {
                    expected: 100,
                    actual: 64
                },
                ..
            }
        ));
    }
}
