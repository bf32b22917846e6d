//! Variable-length blobs keyed by (record id, type key).

use std::borrow::Cow;
use std::collections::BTreeMap;

use tracing::debug;

use super::FIXED_META_MAGIC;
use super::value::{field_int, read_i32, read_u8, read_u16, read_u24, read_u32};
use crate::layout::{FieldDef, IdWidth, PointerTarget, VarIndexLayout, VarKey, VarPointer};

/// Data bytes carried by the first block of a deferred chain.
const FIRST_BLOCK: usize = 28;
/// Data bytes carried by every later block.
const NEXT_BLOCK: usize = 32;
const END_OF_CHAIN: i32 = -1;

fn read_width(data: &[u8], offset: usize, width: IdWidth) -> Option<u32> {
    match width {
        IdWidth::U8 => read_u8(data, offset).map(u32::from),
        IdWidth::U16 => read_u16(data, offset).map(u32::from),
        IdWidth::U24 => read_u24(data, offset),
        IdWidth::U32 => read_u32(data, offset),
    }
}

/// A table entry whose blob lies outside the data stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedEntry {
    pub id: i64,
    pub key: VarKey,
}

/// The variable index does not start with a recognised magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownIndexMagic {
    pub found: u32,
}

/// Stored pointer `v` addresses offset `-1 - v`; `None` when the record has
/// no blob.
fn pointer_offset(stored: i32) -> Option<usize> {
    usize::try_from(-1 - i64::from(stored)).ok().filter(|&offset| offset > 0)
}

/// Reassemble the chained blocks starting at `offset`: a `next` link, the
/// total size, then 28 data bytes; each later block is a `next` link then
/// 32 data bytes. The chain ends at a link of `-1`.
fn read_chain(data: &[u8], offset: usize) -> Option<Cow<'_, [u8]>> {
    if offset == 0 || offset >= data.len() {
        return None;
    }
    let mut next = read_i32(data, offset)?;
    let size = usize::try_from(read_i32(data, offset + 4)?)
        .ok()
        .filter(|&size| size > 0 && size < data.len())?;
    let mut at = offset + 8;
    if next == END_OF_CHAIN {
        if size > FIRST_BLOCK {
            return None;
        }
        return data.get(at..at + size).map(Cow::Borrowed);
    }

    let mut out = Vec::with_capacity(size);
    let mut block = FIRST_BLOCK;
    let mut hops = data.len() / NEXT_BLOCK + 1;
    while next != END_OF_CHAIN {
        hops = hops.checked_sub(1)?;
        let take = block.min(size - out.len());
        out.extend_from_slice(data.get(at..at + take)?);
        let link = usize::try_from(next).ok()?;
        next = read_i32(data, link)?;
        at = link + 4;
        block = NEXT_BLOCK;
    }
    let rest = size - out.len();
    out.extend_from_slice(data.get(at..at + rest)?);
    Some(Cow::Owned(out))
}

/// Entries of an extended-data blob: `i32` size, `i32` type, then bytes.
fn extended_entries(blob: &[u8]) -> impl Iterator<Item = (i32, &[u8])> {
    let mut offset = 0;
    std::iter::from_fn(move || {
        let size = usize::try_from(read_i32(blob, offset)?).ok()?;
        let kind = read_i32(blob, offset + 4)?;
        let start = offset + 8;
        let bytes = blob.get(start..start.checked_add(size)?)?;
        offset = start + size;
        Some((kind, bytes))
    })
}

/// Resolved variable data of one table. Every entry is validated once when
/// the table is built; lookups never re-check bounds.
#[derive(Debug, Clone, Default)]
pub struct VarTable<'a> {
    blobs: BTreeMap<(i64, VarKey), Cow<'a, [u8]>>,
    malformed: Vec<MalformedEntry>,
}

impl<'a> VarTable<'a> {
    fn store(&mut self, id: i64, key: VarKey, blob: Option<Cow<'a, [u8]>>) {
        if self.blobs.contains_key(&(id, key)) {
            return;
        }
        match blob {
            Some(blob) => {
                self.blobs.insert((id, key), blob);
            }
            None => self.malformed.push(MalformedEntry { id, key }),
        }
    }

    /// Register the blob at `offset` (a `u32` length followed by the bytes).
    fn insert(&mut self, data: &'a [u8], id: i64, key: VarKey, offset: usize) {
        let blob = read_u32(data, offset).and_then(|len| {
            let start = offset.checked_add(4)?;
            let end = start.checked_add(usize::try_from(len).ok()?)?;
            data.get(start..end).map(Cow::Borrowed)
        });
        self.store(id, key, blob);
    }

    /// Parse a side index: a 24-byte header holding the magic number and
    /// entry count, then fixed-size entries mapping (id, key) to an offset
    /// into `data`. A stream too short for its header is an empty table.
    pub fn indexed(
        index: &[u8],
        data: &'a [u8],
        layout: &VarIndexLayout,
    ) -> Result<Self, UnknownIndexMagic> {
        let mut table = Self::default();
        if index.len() < layout.header_len {
            debug!(len = index.len(), "variable index shorter than its header");
            return Ok(table);
        }
        let magic = read_u32(index, 0).unwrap_or(0);
        if magic != FIXED_META_MAGIC && !(layout.zero_magic && magic == 0) {
            return Err(UnknownIndexMagic { found: magic });
        }

        let declared = read_u32(index, layout.count_offset).unwrap_or(0) as usize;
        let available = (index.len() - layout.header_len) / layout.entry_len;
        if declared > available {
            debug!(declared, available, "variable index shorter than its entry count");
        }
        for i in 0..declared.min(available) {
            let entry = layout.header_len + i * layout.entry_len;
            let id = read_width(index, entry + layout.id_offset, layout.id_width);
            let key = read_width(index, entry + layout.key_offset, layout.key_width);
            let offset = read_u32(index, entry + layout.data_offset);
            let (Some(id), Some(key), Some(offset)) = (id, key, offset) else {
                continue;
            };
            let Ok(key) = u16::try_from(key) else {
                continue;
            };
            table.insert(data, i64::from(id), VarKey(key), offset as usize);
        }
        Ok(table)
    }

    /// Collect pointers embedded in the fixed records and follow them into
    /// the chained blocks of `data`.
    pub fn deferred(
        fixed: &[u8],
        stride: usize,
        count: usize,
        key: &FieldDef,
        pointers: &[VarPointer],
        data: &'a [u8],
    ) -> Self {
        let mut table = Self::default();
        for index in 0..count {
            let Some(record) = fixed.get(index * stride..(index + 1) * stride) else {
                break;
            };
            let Some(id) = field_int(record, key) else {
                continue;
            };
            for pointer in pointers {
                let Some(offset) = read_i32(record, pointer.offset).and_then(pointer_offset)
                else {
                    continue;
                };
                table.follow(data, id, pointer.target, offset);
            }
        }
        table
    }

    fn follow(&mut self, data: &'a [u8], id: i64, target: PointerTarget, offset: usize) {
        match target {
            PointerTarget::Blob(key) => self.store(id, key, read_chain(data, offset)),
            PointerTarget::Extended(keys) => {
                let Some(blob) = read_chain(data, offset) else {
                    if let Some(&key) = keys.first() {
                        self.malformed.push(MalformedEntry { id, key });
                    }
                    return;
                };
                for (kind, bytes) in extended_entries(&blob) {
                    let Some(&key) = keys.iter().find(|key| i32::from(key.0) == kind) else {
                        continue;
                    };
                    if let Some(offset) = read_i32(bytes, 0).and_then(pointer_offset) {
                        self.store(id, key, read_chain(data, offset));
                    }
                }
            }
            PointerTarget::Nested { key, offset: inner } => {
                let nested = read_chain(data, offset)
                    .and_then(|blob| read_i32(&blob, inner))
                    .and_then(pointer_offset);
                if let Some(offset) = nested {
                    self.store(id, key, read_chain(data, offset));
                }
            }
        }
    }

    /// Blob bytes for `(id, key)`, if present and well formed.
    #[must_use]
    pub fn get(&self, id: i64, key: VarKey) -> Option<&[u8]> {
        self.blobs.get(&(id, key)).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Entries rejected during validation, in index order.
    #[must_use]
    pub fn malformed(&self) -> &[MalformedEntry] {
        &self.malformed
    }
}
