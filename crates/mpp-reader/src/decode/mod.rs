//! Generic record-table decoding driven by layout descriptors.

mod obfuscation;
pub(crate) mod value;
mod var;

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use mpp_cfb::CompoundFile;
use mpp_model::Duration;
use tracing::debug;

pub use obfuscation::Obfuscation;
pub use value::{FieldValue, WideStr};
pub use var::{MalformedEntry, UnknownIndexMagic, VarTable};

use crate::error::{ReadError, Result};
use crate::layout::{
    DateEncoding, FieldDef, FieldKind, TableLayout, TextEncoding, VarKey, VarSource, VarText,
};

/// Magic number at the start of fixed meta and variable index streams.
pub const FIXED_META_MAGIC: u32 = 0xFADF_ADBA;
const FIXED_META_COUNT_OFFSET: usize = 8;

/// Decoder for one record table.
#[derive(Debug)]
pub struct TableDecoder<'a> {
    layout: &'static TableLayout,
    dates: &'static DateEncoding,
    fixed: Cow<'a, [u8]>,
    stride: usize,
    count: usize,
    var: Option<VarTable<'a>>,
}

impl<'a> TableDecoder<'a> {
    /// Open the table described by `layout`.
    ///
    /// Returns `Ok(None)` when an optional table's fixed block is absent.
    pub fn open(
        file: &'a CompoundFile,
        layout: &'static TableLayout,
        dates: &'static DateEncoding,
        obfuscation: Obfuscation,
    ) -> Result<Option<Self>> {
        let fixed_path = layout.path(layout.fixed_data);
        let Some(raw) = file.stream(&fixed_path) else {
            if layout.required {
                return Err(ReadError::missing_stream(fixed_path));
            }
            debug!(table = layout.label, "table absent");
            return Ok(None);
        };
        let fixed = if layout.obfuscated {
            obfuscation.apply(raw)
        } else {
            Cow::Borrowed(raw)
        };

        let stride = layout.stride_for(fixed.len()).max(1);
        let count = match layout.fixed_meta {
            Some(meta) => read_meta_count(file, &layout.path(meta))?,
            None => None,
        }
        .unwrap_or(fixed.len() / stride);

        let var = match layout.var {
            Some(VarSource::Indexed {
                index,
                data,
                layout: entries,
            }) => {
                let index_path = layout.path(index);
                let index = file.stream(&index_path);
                let data = file.stream(&layout.path(data));
                match (index, data) {
                    (Some(index), Some(data)) => Some(
                        VarTable::indexed(index, data, &entries).map_err(|magic| {
                            ReadError::BadMagic {
                                path: index_path.clone(),
                                found: magic.found,
                            }
                        })?,
                    ),
                    _ => None,
                }
            }
            Some(VarSource::Deferred { data, pointers }) => {
                file.stream(&layout.path(data)).map(|data| {
                    VarTable::deferred(&fixed, stride, count, &layout.key, pointers, data)
                })
            }
            None => None,
        };

        debug!(
            table = layout.label,
            records = count,
            stride,
            bytes = fixed.len(),
            blobs = var.as_ref().map_or(0, VarTable::len),
            "opened table"
        );
        Ok(Some(Self {
            layout,
            dates,
            fixed,
            stride,
            count,
            var,
        }))
    }

    #[must_use]
    pub fn layout(&self) -> &'static TableLayout {
        self.layout
    }

    /// Record width chosen for this file.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Declared number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Variable-data entries rejected during validation.
    #[must_use]
    pub fn malformed(&self) -> &[MalformedEntry] {
        self.var.as_ref().map(VarTable::malformed).unwrap_or_default()
    }

    /// Records in stored order. A record running past the end of the fixed
    /// block yields `TruncatedRecord` and ends the iteration.
    pub fn records(&self) -> Records<'_> {
        Records {
            decoder: self,
            next: 0,
            done: false,
        }
    }

    fn record(&self, index: usize) -> Result<RawRecord<'_>> {
        let stride = self.stride;
        let start = index * stride;
        let fixed = self.fixed.get(start..start + stride).ok_or(ReadError::TruncatedRecord {
            table: self.layout.label,
            index,
            stride,
            available: self.fixed.len().saturating_sub(start),
        })?;
        let key = value::field_int(fixed, &self.layout.key).ok_or_else(|| {
            ReadError::corrupt(format!(
                "{} key field does not fit the record stride",
                self.layout.label
            ))
        })?;
        Ok(RawRecord {
            index,
            key,
            fixed,
            var: self.var.as_ref(),
            dates: self.dates,
        })
    }
}

/// Record count from a fixed meta header, `None` when the stream is absent.
fn read_meta_count(file: &CompoundFile, path: &str) -> Result<Option<usize>> {
    let Some(meta) = file.stream(path) else {
        debug!(path, "fixed meta absent, deriving count from length");
        return Ok(None);
    };
    let magic = value::read_u32(meta, 0)
        .ok_or_else(|| ReadError::corrupt(format!("{path} is too short")))?;
    if magic != FIXED_META_MAGIC && magic != 0 {
        return Err(ReadError::BadMagic {
            path: path.to_string(),
            found: magic,
        });
    }
    let count = value::read_u32(meta, FIXED_META_COUNT_OFFSET)
        .ok_or_else(|| ReadError::corrupt(format!("{path} is too short")))?;
    Ok(Some(count as usize))
}

/// Lazy iterator over a table's records.
#[derive(Debug)]
pub struct Records<'d> {
    decoder: &'d TableDecoder<'d>,
    next: usize,
    done: bool,
}

impl<'d> Iterator for Records<'d> {
    type Item = Result<RawRecord<'d>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.decoder.count {
            return None;
        }
        let item = self.decoder.record(self.next);
        self.next += 1;
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// One fixed-width record window with access to its variable data.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    index: usize,
    key: i64,
    fixed: &'a [u8],
    var: Option<&'a VarTable<'a>>,
    dates: &'a DateEncoding,
}

impl<'a> RawRecord<'a> {
    /// Position in the table.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Decoded key field.
    #[must_use]
    pub fn key(&self) -> i64 {
        self.key
    }

    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.fixed
    }

    #[must_use]
    pub fn int(&self, field: &FieldDef) -> Option<i64> {
        value::field_int(self.fixed, field)
    }

    /// Reference field: an `i32` where negative values mean "none".
    #[must_use]
    pub fn reference(&self, field: &FieldDef) -> Option<i32> {
        self.int(field)
            .and_then(|v| i32::try_from(v).ok())
            .filter(|&v| v >= 0)
    }

    #[must_use]
    pub fn float(&self, field: &FieldDef) -> Option<f64> {
        value::field_float(self.fixed, field)
    }

    #[must_use]
    pub fn flag(&self, field: &FieldDef) -> bool {
        value::field_flag(self.fixed, field).unwrap_or(false)
    }

    #[must_use]
    pub fn date(&self, field: &FieldDef) -> Option<NaiveDate> {
        match field.kind {
            FieldKind::Date => value::date(self.dates, value::read_u16(self.fixed, field.offset)?),
            _ => None,
        }
    }

    #[must_use]
    pub fn timestamp(&self, field: &FieldDef) -> Option<NaiveDateTime> {
        value::field_timestamp(self.fixed, field, self.dates)
    }

    #[must_use]
    pub fn duration(&self, field: &FieldDef) -> Option<Duration> {
        value::field_duration(self.fixed, field, self.dates)
    }

    #[must_use]
    pub fn work(&self, field: &FieldDef) -> Option<Duration> {
        value::field_work(self.fixed, field)
    }

    /// Inline text; empty strings are absent.
    #[must_use]
    pub fn text(&self, field: &FieldDef) -> Option<WideStr<'a>> {
        value::field_text(self.fixed, field)
    }

    #[must_use]
    pub fn value(&self, field: &FieldDef) -> FieldValue<'a> {
        value::field_value(self.fixed, field, self.dates)
    }

    /// Variable-length blob for `key`.
    #[must_use]
    pub fn var(&self, key: VarKey) -> Option<&'a [u8]> {
        self.var?.get(self.key, key)
    }

    /// Variable-length blob decoded as text; empty strings are absent.
    #[must_use]
    pub fn var_text(&self, key: VarKey) -> Option<WideStr<'a>> {
        let text = WideStr::new(self.var(key)?);
        (!text.is_empty()).then_some(text)
    }

    /// Owned text of a variable blob in the given encoding.
    #[must_use]
    pub fn var_string(&self, text: VarText) -> Option<String> {
        match text.encoding {
            TextEncoding::Wide => self.var_text(text.key).map(|text| text.to_string()),
            TextEncoding::Ansi => value::ansi_text(self.var(text.key)?),
        }
    }
}
