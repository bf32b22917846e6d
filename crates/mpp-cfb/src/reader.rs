//! Stream extraction from a compound container.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::directory::{EntryType, parse_entries, walk};
use crate::error::{ContainerError, Result};
use crate::fat::{AllocationTable, Sectors, load_fat, read_mini_chain};
use crate::header::{END_OF_CHAIN, Header};

/// A stream reassembled from its sector chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    path: String,
    data: Vec<u8>,
    sectors: Vec<u32>,
    in_mini_stream: bool,
}

impl Stream {
    /// Full `/`-separated path below the root storage.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sector numbers (regular or mini) the stream was read from, in order.
    pub fn sectors(&self) -> &[u32] {
        &self.sectors
    }

    /// Whether the stream lives in the mini stream.
    pub fn in_mini_stream(&self) -> bool {
        self.in_mini_stream
    }
}

/// A parsed compound container: every stream, keyed by path.
#[derive(Debug, Clone)]
pub struct CompoundFile {
    major_version: u16,
    sector_size: usize,
    streams: BTreeMap<String, Stream>,
    storages: BTreeSet<String>,
}

impl CompoundFile {
    /// Read and parse a container from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ContainerError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ContainerError::Io(e)
            }
        })?;
        Self::parse(&data)
    }

    /// Parse a container held in memory.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Header::parse(data)?;
        let sectors = Sectors::new(data, &header);
        let available = sectors.count();
        let fat = load_fat(&sectors, &header)?;

        let directory_chain = fat.chain(header.first_directory_sector, available)?;
        let directory_bytes =
            sectors.read_chain(header.first_directory_sector, &directory_chain, None)?;
        let entries = parse_entries(&directory_bytes, header.major_version)?;

        let mini_fat = if header.first_mini_fat_sector == END_OF_CHAIN {
            AllocationTable::default()
        } else {
            let chain = fat.chain(header.first_mini_fat_sector, available)?;
            AllocationTable::from_bytes(&sectors.read_chain(
                header.first_mini_fat_sector,
                &chain,
                None,
            )?)
        };

        let root = &entries[0];
        let mini_stream = if root.size == 0 {
            Vec::new()
        } else {
            let chain = fat.chain(root.start_sector, available)?;
            sectors.read_chain(root.start_sector, &chain, Some(root.size))?
        };
        let mini_available = mini_stream.len().div_ceil(header.mini_sector_size());

        let mut streams = BTreeMap::new();
        let mut storages = BTreeSet::new();
        for placed in walk(&entries)? {
            let entry = &entries[placed.index];
            if entry.entry_type == EntryType::Storage {
                storages.insert(placed.path);
                continue;
            }
            let in_mini_stream = entry.size < u64::from(header.mini_stream_cutoff);
            let (chain, data) = if entry.size == 0 {
                (Vec::new(), Vec::new())
            } else if in_mini_stream {
                let chain = mini_fat.chain(entry.start_sector, mini_available)?;
                let data = read_mini_chain(
                    &mini_stream,
                    header.mini_sector_size(),
                    entry.start_sector,
                    &chain,
                    entry.size,
                )?;
                (chain, data)
            } else {
                let chain = fat.chain(entry.start_sector, available)?;
                let data = sectors.read_chain(entry.start_sector, &chain, Some(entry.size))?;
                (chain, data)
            };
            streams.insert(
                placed.path.clone(),
                Stream {
                    path: placed.path,
                    data,
                    sectors: chain,
                    in_mini_stream,
                },
            );
        }

        debug!(
            version = header.major_version,
            sector_size = header.sector_size(),
            streams = streams.len(),
            storages = storages.len(),
            "parsed compound container"
        );

        Ok(Self {
            major_version: header.major_version,
            sector_size: header.sector_size(),
            streams,
            storages,
        })
    }

    /// Content of the stream at `path`, if present.
    pub fn stream(&self, path: &str) -> Option<&[u8]> {
        self.streams.get(path).map(Stream::data)
    }

    pub fn get(&self, path: &str) -> Option<&Stream> {
        self.streams.get(path)
    }

    /// All streams ordered by path.
    pub fn streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams.values()
    }

    /// All storage paths, ordered.
    pub fn storages(&self) -> impl Iterator<Item = &str> {
        self.storages.iter().map(String::as_str)
    }

    pub fn has_storage(&self, path: &str) -> bool {
        self.storages.contains(path)
    }

    pub fn has_stream(&self, path: &str) -> bool {
        self.streams.contains_key(path)
    }

    /// Number of streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    pub fn sector_size(&self) -> usize {
        self.sector_size
    }
}
