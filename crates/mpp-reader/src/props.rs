//! Keyed property blobs.
//!
//! A property stream is a header followed by `count` entries of
//! `[i32 size][i32 key][size bytes]`, each padded to an even length.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use mpp_cfb::CompoundFile;
use tracing::debug;

use crate::decode::value::{self, read_i32, read_u16, read_u32};
use crate::decode::{Obfuscation, WideStr};
use crate::error::Result;
use crate::layout::{DateEncoding, PropertyLayout};

/// Well-known property keys.
pub mod keys {
    pub const PASSWORD_FLAG: i32 = 893_386_752;
    pub const PROTECTION_PASSWORD_HASH: i32 = 893_386_756;
    pub const ENCRYPTION_CODE: i32 = 893_386_759;
    pub const PROJECT_FILE_PATH: i32 = 893_386_760;

    pub const PROJECT_START_DATE: i32 = 37_748_738;
    pub const PROJECT_FINISH_DATE: i32 = 37_748_739;
    pub const DEFAULT_CALENDAR_NAME: i32 = 37_748_750;
    pub const CURRENCY_SYMBOL: i32 = 37_748_752;
    pub const MINUTES_PER_DAY: i32 = 37_748_765;
    pub const MINUTES_PER_WEEK: i32 = 37_748_766;
    pub const STATUS_DATE: i32 = 37_748_805;

    /// Name of the table a view displays, stored in the view's blob.
    pub const VIEW_TABLE_NAME: i32 = 574_619_658;
}

/// Positions of the password characters inside the decoded hash block.
const PASSWORD_POSITIONS: [usize; 16] = [
    60, 30, 48, 2, 6, 14, 8, 22, 44, 12, 38, 10, 62, 16, 34, 24,
];
const MIN_PASSWORD_HASH_LEN: usize = 64;

/// Bit of [`keys::PASSWORD_FLAG`] set when a read password was supplied.
pub const READ_PASSWORD_BIT: u8 = 0x01;

/// Parsed property entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
    entries: BTreeMap<i32, Vec<u8>>,
}

impl Props {
    /// Parse a property blob. Parsing stops quietly at the first entry that
    /// runs past the end of `data`.
    #[must_use]
    pub fn parse(data: &[u8], header_len: usize, count_offset: usize) -> Self {
        let count = read_u16(data, count_offset).unwrap_or(0);
        let mut entries = BTreeMap::new();
        let mut offset = header_len;
        for _ in 0..count {
            let (Some(size), Some(key)) = (read_i32(data, offset), read_i32(data, offset + 4))
            else {
                debug!(offset, "property entry header past end of blob");
                break;
            };
            let Ok(size) = usize::try_from(size) else {
                break;
            };
            let Some(bytes) = value::slice(data, offset + 8, size) else {
                debug!(key, size, "property entry past end of blob");
                break;
            };
            entries.entry(key).or_insert_with(|| bytes.to_vec());
            offset += 8 + size + size % 2;
        }
        Self { entries }
    }

    /// Read and parse the stream named by `layout`; `None` when it is absent.
    pub fn read(
        file: &CompoundFile,
        layout: &PropertyLayout,
        obfuscation: Obfuscation,
    ) -> Result<Option<Self>> {
        let Some(raw) = file.stream(layout.stream) else {
            debug!(stream = layout.stream, "property stream absent");
            return Ok(None);
        };
        let data = if layout.obfuscated {
            obfuscation.apply(raw)
        } else {
            Cow::Borrowed(raw)
        };
        let props = Self::parse(&data, layout.header_len, layout.count_offset);
        debug!(stream = layout.stream, entries = props.len(), "read properties");
        Ok(Some(props))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: i32) -> Option<&[u8]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn byte(&self, key: i32) -> Option<u8> {
        self.get(key)?.first().copied()
    }

    #[must_use]
    pub fn int(&self, key: i32) -> Option<i32> {
        read_i32(self.get(key)?, 0)
    }

    #[must_use]
    pub fn u32(&self, key: i32) -> Option<u32> {
        read_u32(self.get(key)?, 0)
    }

    /// Nul-terminated UTF-16LE text; empty strings are absent.
    #[must_use]
    pub fn text(&self, key: i32) -> Option<String> {
        let text = WideStr::new(self.get(key)?);
        (!text.is_empty()).then(|| text.to_string())
    }

    #[must_use]
    pub fn timestamp(&self, key: i32, dates: &DateEncoding) -> Option<NaiveDateTime> {
        value::timestamp(dates, self.get(key)?)
    }

    /// Read password held in the protection hash, or `None` when the block
    /// is too short to carry one.
    #[must_use]
    pub fn read_password(&self, obfuscation: Obfuscation) -> Option<String> {
        let hash = self.get(keys::PROTECTION_PASSWORD_HASH)?;
        if hash.len() < MIN_PASSWORD_HASH_LEN {
            return None;
        }
        let hash = obfuscation.apply(hash);
        Some(
            PASSWORD_POSITIONS
                .iter()
                .map_while(|&i| hash.get(i).copied().filter(|&b| b != 0))
                .map(char::from)
                .collect(),
        )
    }

    /// The file requires a read password. A set flag with an empty password
    /// does not count.
    #[must_use]
    pub fn is_read_protected(&self, obfuscation: Obfuscation) -> bool {
        let flagged = self
            .byte(keys::PASSWORD_FLAG)
            .is_some_and(|flag| flag & READ_PASSWORD_BIT != 0);
        flagged
            && self
                .read_password(obfuscation)
                .is_some_and(|password| !password.is_empty())
    }
}
