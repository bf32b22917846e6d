//! Directory entries and tree traversal.

use crate::error::{ContainerError, Result};
use crate::header::{DIRECTORY_ENTRY_LEN, NO_STREAM, read_u16, read_u32, read_u64};

/// Object type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Empty,
    Storage,
    Stream,
    Root,
}

impl EntryType {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Empty),
            1 => Some(Self::Storage),
            2 => Some(Self::Stream),
            5 => Some(Self::Root),
            _ => None,
        }
    }

    pub(crate) const fn to_byte(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Storage => 1,
            Self::Stream => 2,
            Self::Root => 5,
        }
    }
}

/// One 128-byte directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub entry_type: EntryType,
    pub left: u32,
    pub right: u32,
    pub child: u32,
    pub start_sector: u32,
    pub size: u64,
}

impl DirectoryEntry {
    fn parse(raw: &[u8], index: usize, major_version: u16) -> Result<Self> {
        let type_byte = raw.get(66).copied().unwrap_or_default();
        let entry_type = EntryType::from_byte(type_byte).ok_or_else(|| {
            ContainerError::corrupt_directory(format!(
                "entry {index} has unknown object type {type_byte}"
            ))
        })?;

        let name_len = usize::from(read_u16(raw, 64)?).min(64);
        let units = name_len / 2;
        let name = char::decode_utf16(
            raw[..units * 2]
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .take_while(|&unit| unit != 0),
        )
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();

        let mut size = read_u64(raw, 120)?;
        if major_version == 3 {
            size &= 0xFFFF_FFFF;
        }

        Ok(Self {
            name,
            entry_type,
            left: read_u32(raw, 68)?,
            right: read_u32(raw, 72)?,
            child: read_u32(raw, 76)?,
            start_sector: read_u32(raw, 116)?,
            size,
        })
    }
}

/// Parse every entry of the concatenated directory chain.
pub(crate) fn parse_entries(bytes: &[u8], major_version: u16) -> Result<Vec<DirectoryEntry>> {
    let entries = bytes
        .chunks_exact(DIRECTORY_ENTRY_LEN)
        .enumerate()
        .map(|(index, raw)| DirectoryEntry::parse(raw, index, major_version))
        .collect::<Result<Vec<_>>>()?;
    match entries.first() {
        Some(root) if root.entry_type == EntryType::Root => Ok(entries),
        Some(_) => Err(ContainerError::corrupt_directory(
            "first entry is not the root storage",
        )),
        None => Err(ContainerError::corrupt_directory("directory is empty")),
    }
}

/// A storage or stream reached from the root, with its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placed {
    pub path: String,
    pub index: usize,
}

/// Walk the sibling trees from the root entry and return every storage and
/// stream with its `/`-joined path. The root itself is excluded.
pub(crate) fn walk(entries: &[DirectoryEntry]) -> Result<Vec<Placed>> {
    let mut placed = Vec::new();
    let mut visited = vec![false; entries.len()];
    visited[0] = true;

    let mut pending: Vec<(u32, String)> = vec![(entries[0].child, String::new())];
    while let Some((id, parent)) = pending.pop() {
        if id == NO_STREAM {
            continue;
        }
        let index = id as usize;
        let entry = entries.get(index).ok_or_else(|| {
            ContainerError::corrupt_directory(format!("reference to missing entry {id}"))
        })?;
        if visited[index] {
            return Err(ContainerError::corrupt_directory(format!(
                "entry {id} is reachable twice"
            )));
        }
        visited[index] = true;

        pending.push((entry.left, parent.clone()));
        pending.push((entry.right, parent.clone()));

        let path = if parent.is_empty() {
            entry.name.clone()
        } else {
            format!("{parent}/{}", entry.name)
        };
        match entry.entry_type {
            EntryType::Storage => {
                pending.push((entry.child, path.clone()));
                placed.push(Placed { path, index });
            }
            EntryType::Stream => placed.push(Placed { path, index }),
            EntryType::Root | EntryType::Empty => {
                return Err(ContainerError::corrupt_directory(format!(
                    "entry {id} has type {:?} inside the tree",
                    entry.entry_type
                )));
            }
        }
    }
    Ok(placed)
}
