//! Version-3 container writer.
//!
//! Produces 512-byte-sector containers with a mini stream for small
//! streams. Storages are implied by stream paths. DIFAT sectors are not
//! written, which caps the output at 109 FAT sectors (about 7 MiB).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::directory::EntryType;
use crate::error::{ContainerError, Result};
use crate::header::{
    DIRECTORY_ENTRY_LEN, END_OF_CHAIN, FAT_SECTOR, FREE_SECTOR, HEADER_DIFAT_ENTRIES, HEADER_LEN,
    MINI_STREAM_CUTOFF, NO_STREAM, SIGNATURE,
};

const SECTOR: usize = 512;
const MINI_SECTOR: usize = 64;
const ENTRIES_PER_SECTOR: usize = SECTOR / 4;
const MAX_NAME_UNITS: usize = 31;

/// Builds a compound container in memory.
#[derive(Debug, Clone, Default)]
pub struct CompoundFileWriter {
    streams: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug)]
struct Node {
    name: String,
    entry_type: EntryType,
    children: Vec<usize>,
    stream: Option<String>,
    start_sector: u32,
    size: u64,
}

impl Node {
    fn new(name: &str, entry_type: EntryType) -> Self {
        Self {
            name: name.to_string(),
            entry_type,
            children: Vec::new(),
            stream: None,
            start_sector: END_OF_CHAIN,
            size: 0,
        }
    }
}

impl CompoundFileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a stream. Intermediate storages are created on
    /// demand from the `/`-separated path.
    pub fn add_stream(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<()> {
        let path = path.into();
        let valid = !path.is_empty()
            && path.split('/').all(|part| {
                let units = part.encode_utf16().count();
                units > 0 && units <= MAX_NAME_UNITS
            });
        if !valid {
            return Err(ContainerError::InvalidPath { path });
        }
        let shadows_storage = self
            .streams
            .keys()
            .any(|existing| existing.starts_with(&format!("{path}/")));
        let under_stream = path
            .match_indices('/')
            .any(|(at, _)| self.streams.contains_key(&path[..at]));
        if shadows_storage || under_stream {
            return Err(ContainerError::InvalidPath { path });
        }
        self.streams.insert(path, data.into());
        Ok(())
    }

    /// Builder form of [`Self::add_stream`].
    pub fn with_stream(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<Self> {
        self.add_stream(path, data)?;
        Ok(self)
    }

    /// Lay out sectors and serialize the container.
    pub fn finish(&self) -> Result<Vec<u8>> {
        let mut nodes = self.build_tree()?;

        // Mini stream for small streams.
        let mut mini_stream = Vec::new();
        let mut mini_fat: Vec<u32> = Vec::new();
        for node in nodes.iter_mut() {
            let Some(path) = &node.stream else { continue };
            let data = &self.streams[path];
            node.size = data.len() as u64;
            if data.is_empty() || data.len() >= MINI_STREAM_CUTOFF as usize {
                continue;
            }
            let first = mini_fat.len();
            let count = data.len().div_ceil(MINI_SECTOR);
            node.start_sector = first as u32;
            chain_run(&mut mini_fat, first, count);
            mini_stream.extend_from_slice(data);
            mini_stream.resize((first + count) * MINI_SECTOR, 0);
        }

        let directory_sectors = (nodes.len() * DIRECTORY_ENTRY_LEN).div_ceil(SECTOR);
        let mini_fat_sectors = (mini_fat.len() * 4).div_ceil(SECTOR);
        let mini_stream_sectors = mini_stream.len().div_ceil(SECTOR);
        let large_sectors: usize = nodes
            .iter()
            .filter(|n| n.size as usize >= MINI_STREAM_CUTOFF as usize)
            .map(|n| (n.size as usize).div_ceil(SECTOR))
            .sum();
        let content = directory_sectors + mini_fat_sectors + mini_stream_sectors + large_sectors;

        let mut fat_sectors = 1;
        while fat_sectors * ENTRIES_PER_SECTOR < fat_sectors + content {
            fat_sectors += 1;
        }
        if fat_sectors > HEADER_DIFAT_ENTRIES {
            return Err(ContainerError::TooLarge {
                sectors: fat_sectors + content,
            });
        }

        let mut fat = vec![FREE_SECTOR; fat_sectors * ENTRIES_PER_SECTOR];
        fat[..fat_sectors].fill(FAT_SECTOR);
        let mut next = fat_sectors;

        let directory_start = next;
        chain_into(&mut fat, directory_start, directory_sectors);
        next += directory_sectors;

        let mini_fat_start = next;
        chain_into(&mut fat, mini_fat_start, mini_fat_sectors);
        next += mini_fat_sectors;

        let mini_stream_start = next;
        chain_into(&mut fat, mini_stream_start, mini_stream_sectors);
        next += mini_stream_sectors;

        let mut large: Vec<(usize, String)> = Vec::new();
        for node in nodes.iter_mut() {
            let Some(path) = &node.stream else { continue };
            let len = node.size as usize;
            if len < MINI_STREAM_CUTOFF as usize {
                continue;
            }
            let count = len.div_ceil(SECTOR);
            node.start_sector = next as u32;
            chain_into(&mut fat, next, count);
            large.push((next, path.clone()));
            next += count;
        }

        if !mini_stream.is_empty() {
            nodes[0].start_sector = mini_stream_start as u32;
            nodes[0].size = mini_stream.len() as u64;
        }

        let mut out = vec![0u8; HEADER_LEN + next * SECTOR];
        write_header(
            &mut out,
            fat_sectors,
            directory_start,
            if mini_fat_sectors == 0 {
                END_OF_CHAIN
            } else {
                mini_fat_start as u32
            },
            mini_fat_sectors,
        );

        for (i, entry) in fat.iter().enumerate() {
            put_u32(&mut out, HEADER_LEN + i * 4, *entry);
        }

        let directory_offset = HEADER_LEN + directory_start * SECTOR;
        let slots = directory_sectors * SECTOR / DIRECTORY_ENTRY_LEN;
        let siblings = right_siblings(&nodes);
        for slot in 0..slots {
            let at = directory_offset + slot * DIRECTORY_ENTRY_LEN;
            match nodes.get(slot) {
                Some(node) => write_entry(&mut out, at, node, siblings[slot]),
                None => write_empty_entry(&mut out, at),
            }
        }

        let mut padded_mini_fat = mini_fat;
        padded_mini_fat.resize(mini_fat_sectors * ENTRIES_PER_SECTOR, FREE_SECTOR);
        for (i, entry) in padded_mini_fat.iter().enumerate() {
            put_u32(&mut out, HEADER_LEN + mini_fat_start * SECTOR + i * 4, *entry);
        }

        let at = HEADER_LEN + mini_stream_start * SECTOR;
        out[at..at + mini_stream.len()].copy_from_slice(&mini_stream);

        for (start, path) in large {
            let data = &self.streams[&path];
            let at = HEADER_LEN + start * SECTOR;
            out[at..at + data.len()].copy_from_slice(data);
        }

        Ok(out)
    }

    fn build_tree(&self) -> Result<Vec<Node>> {
        let mut nodes = vec![Node::new("Root Entry", EntryType::Root)];
        let mut storages: BTreeMap<String, usize> = BTreeMap::new();

        for path in self.streams.keys() {
            let parts: Vec<&str> = path.split('/').collect();
            let mut parent = 0;
            let mut prefix = String::new();
            for storage in &parts[..parts.len() - 1] {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(storage);
                if self.streams.contains_key(&prefix) {
                    return Err(ContainerError::InvalidPath { path: path.clone() });
                }
                parent = match storages.get(&prefix) {
                    Some(&index) => index,
                    None => {
                        let index = nodes.len();
                        nodes.push(Node::new(storage, EntryType::Storage));
                        nodes[parent].children.push(index);
                        storages.insert(prefix.clone(), index);
                        index
                    }
                };
            }
            let index = nodes.len();
            let mut node = Node::new(parts[parts.len() - 1], EntryType::Stream);
            node.stream = Some(path.clone());
            nodes.push(node);
            nodes[parent].children.push(index);
        }

        let names: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
        for node in &mut nodes {
            node.children
                .sort_by(|&a, &b| compare_names(&names[a], &names[b]));
        }
        Ok(nodes)
    }
}

/// Directory ordering: shorter names first, then case-insensitive.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.encode_utf16()
        .count()
        .cmp(&b.encode_utf16().count())
        .then_with(|| a.to_uppercase().cmp(&b.to_uppercase()))
}

fn chain_run(table: &mut Vec<u32>, first: usize, count: usize) {
    table.resize(first + count, FREE_SECTOR);
    chain_into(table, first, count);
}

fn chain_into(table: &mut [u32], first: usize, count: usize) {
    for i in 0..count {
        let sector = first + i;
        table[sector] = if i + 1 == count {
            END_OF_CHAIN
        } else {
            (sector + 1) as u32
        };
    }
}

fn put_u16(out: &mut [u8], at: usize, value: u16) {
    out[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut [u8], at: usize, value: u32) {
    out[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn write_header(
    out: &mut [u8],
    fat_sectors: usize,
    directory_start: usize,
    mini_fat_start: u32,
    mini_fat_sectors: usize,
) {
    out[..8].copy_from_slice(&SIGNATURE);
    put_u16(out, 24, 0x003E);
    put_u16(out, 26, 3);
    put_u16(out, 28, 0xFFFE);
    put_u16(out, 30, 9);
    put_u16(out, 32, 6);
    put_u32(out, 44, fat_sectors as u32);
    put_u32(out, 48, directory_start as u32);
    put_u32(out, 56, MINI_STREAM_CUTOFF);
    put_u32(out, 60, mini_fat_start);
    put_u32(out, 64, mini_fat_sectors as u32);
    put_u32(out, 68, END_OF_CHAIN);
    put_u32(out, 72, 0);
    for i in 0..HEADER_DIFAT_ENTRIES {
        let value = if i < fat_sectors { i as u32 } else { FREE_SECTOR };
        put_u32(out, 76 + i * 4, value);
    }
}

fn write_entry(out: &mut [u8], at: usize, node: &Node, right: u32) {
    let units: Vec<u16> = node.name.encode_utf16().collect();
    for (i, unit) in units.iter().enumerate() {
        put_u16(out, at + i * 2, *unit);
    }
    put_u16(out, at + 64, ((units.len() + 1) * 2) as u16);
    out[at + 66] = node.entry_type.to_byte();
    out[at + 67] = 1;
    put_u32(out, at + 68, NO_STREAM);
    put_u32(out, at + 72, right);
    put_u32(
        out,
        at + 76,
        node.children.first().map_or(NO_STREAM, |&c| c as u32),
    );
    put_u32(out, at + 116, node.start_sector);
    put_u32(out, at + 120, node.size as u32);
}

fn write_empty_entry(out: &mut [u8], at: usize) {
    put_u32(out, at + 68, NO_STREAM);
    put_u32(out, at + 72, NO_STREAM);
    put_u32(out, at + 76, NO_STREAM);
}

/// Siblings are written as a right-leaning chain in directory order.
fn right_siblings(nodes: &[Node]) -> Vec<u32> {
    let mut right = vec![NO_STREAM; nodes.len()];
    for node in nodes {
        for pair in node.children.windows(2) {
            right[pair[0]] = pair[1] as u32;
        }
    }
    right
}
