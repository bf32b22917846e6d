//! Static per-generation record layouts.
//!
//! Everything that differs between file generations lives here as data:
//! storage names, record strides, field offsets, variable-data keys, the
//! date encoding. Decoding logic never branches on the generation; it only
//! reads these descriptors.

use std::fmt;

use chrono::NaiveDate;

mod mpp12;
mod mpp14;
mod mpp8;
mod mpp9;

/// Binary format generation of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileGeneration {
    Mpp8,
    Mpp9,
    Mpp12,
    Mpp14,
}

impl FileGeneration {
    /// Numeric tag carried by the format string (`MSProject.MPP9` is 9).
    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::Mpp8 => 8,
            Self::Mpp9 => 9,
            Self::Mpp12 => 12,
            Self::Mpp14 => 14,
        }
    }

    /// Generation whose format strings include `format` exactly.
    #[must_use]
    pub fn from_format(format: &str) -> Option<Self> {
        SUPPORTED_FORMATS
            .iter()
            .find(|entry| entry.formats.contains(&format))
            .map(|entry| entry.generation)
    }

    #[must_use]
    pub fn layout(self) -> &'static FormatLayout {
        match self {
            Self::Mpp8 => &mpp8::LAYOUT,
            Self::Mpp9 => &mpp9::LAYOUT,
            Self::Mpp12 => &mpp12::LAYOUT,
            Self::Mpp14 => &mpp14::LAYOUT,
        }
    }
}

impl fmt::Display for FileGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MPP{}", self.tag())
    }
}

/// One row of the compatibility table.
#[derive(Debug, Clone, Copy)]
pub struct FormatEntry {
    pub generation: FileGeneration,
    /// Format strings written by applications for this generation.
    pub formats: &'static [&'static str],
}

/// Supported generations and the format strings that select them.
pub static SUPPORTED_FORMATS: &[FormatEntry] = &[
    FormatEntry {
        generation: FileGeneration::Mpp8,
        formats: &["MSProject.MPP8", "MSProject.MPT8"],
    },
    FormatEntry {
        generation: FileGeneration::Mpp9,
        formats: &["MSProject.MPP9", "MSProject.MPT9", "MSProject.GLOBAL9"],
    },
    FormatEntry {
        generation: FileGeneration::Mpp12,
        formats: &["MSProject.MPP12", "MSProject.MPT12", "MSProject.GLOBAL12"],
    },
    FormatEntry {
        generation: FileGeneration::Mpp14,
        formats: &["MSProject.MPP14", "MSProject.MPT14", "MSProject.GLOBAL14"],
    },
];

/// Date and time packing. Timestamps are a `u16` tick count since
/// midnight followed by a `u16` day count since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateEncoding {
    /// Day zero as (year, month, day).
    pub epoch: (i32, u32, u32),
    pub ticks_per_minute: i64,
}

impl DateEncoding {
    #[must_use]
    pub fn epoch_date(&self) -> Option<NaiveDate> {
        let (year, month, day) = self.epoch;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Width of an integer field inside a variable-data index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdWidth {
    U8,
    U16,
    U24,
    U32,
}

impl IdWidth {
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U24 => 3,
            Self::U32 => 4,
        }
    }
}

/// Entry layout of a `VarMeta` side index. The header opens with the meta
/// magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarIndexLayout {
    pub header_len: usize,
    /// Offset of the `u32` entry count in the header.
    pub count_offset: usize,
    /// A zero magic number is accepted alongside the standard one.
    pub zero_magic: bool,
    pub entry_len: usize,
    pub id_offset: usize,
    pub id_width: IdWidth,
    pub key_offset: usize,
    pub key_width: IdWidth,
    /// Offset of the `u32` data-stream offset inside an entry.
    pub data_offset: usize,
}

/// Packed entries: 3-byte id, 1-byte key, 4-byte offset.
pub const COMPACT_INDEX: VarIndexLayout = VarIndexLayout {
    header_len: 24,
    count_offset: 8,
    zero_magic: false,
    entry_len: 8,
    id_offset: 0,
    id_width: IdWidth::U24,
    key_offset: 3,
    key_width: IdWidth::U8,
    data_offset: 4,
};

/// Wide entries: 4-byte id, 4-byte offset, 2-byte key, 2 bytes padding.
pub const WIDE_INDEX: VarIndexLayout = VarIndexLayout {
    header_len: 24,
    count_offset: 8,
    zero_magic: true,
    entry_len: 12,
    id_offset: 0,
    id_width: IdWidth::U32,
    key_offset: 8,
    key_width: IdWidth::U16,
    data_offset: 4,
};

/// Variable-length data type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarKey(pub u16);

/// What a deferred pointer addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The blob itself, stored under `key`.
    Blob(VarKey),
    /// An extended-data blob of `[size][type][bytes]` entries. Each listed
    /// type's entry holds a further pointer to the blob stored under that
    /// type.
    Extended(&'static [VarKey]),
    /// A blob holding, at `offset`, a further pointer to the blob stored
    /// under `key`.
    Nested { key: VarKey, offset: usize },
}

/// Fixed-record offset holding an `i32` pointer into the deferred data
/// stream. The stored value `v` addresses offset `-1 - v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarPointer {
    pub offset: usize,
    pub target: PointerTarget,
}

/// Where a table's variable-length data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSource {
    /// Side index stream keyed by (record id, key) plus a data stream.
    Indexed {
        index: &'static str,
        data: &'static str,
        layout: VarIndexLayout,
    },
    /// Pointers embedded in the fixed record into a data stream.
    Deferred {
        data: &'static str,
        pointers: &'static [VarPointer],
    },
}

/// Width of a scaled integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    U16,
    I32,
    /// Six-byte unsigned integer.
    U48,
}

impl IntWidth {
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::I32 => 4,
            Self::U48 => 6,
        }
    }
}

/// Interpretation of bytes at a field offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    U8,
    U16,
    I32,
    /// `f64` divided by `divisor`.
    F64 { divisor: f64 },
    /// `u16` days since epoch.
    Date,
    Timestamp,
    /// `i32` ticks with a `u16` units code at `units_offset`.
    Duration { units_offset: usize },
    /// `f64` thousandths of a minute, converted to hours.
    Work,
    /// Integer divided by `divisor`. Read as work it counts hours.
    Scaled { width: IntWidth, divisor: f64 },
    /// Bit of the `u16` at the offset.
    Flag { mask: u16 },
    /// Inline nul-terminated UTF-16LE, at most `max_bytes`.
    Text { max_bytes: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub offset: usize,
    pub kind: FieldKind,
}

impl FieldDef {
    #[must_use]
    pub const fn u8(offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::U8,
        }
    }

    #[must_use]
    pub const fn u16(offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::U16,
        }
    }

    #[must_use]
    pub const fn i32(offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::I32,
        }
    }

    #[must_use]
    pub const fn f64(offset: usize, divisor: f64) -> Self {
        Self {
            offset,
            kind: FieldKind::F64 { divisor },
        }
    }

    #[must_use]
    pub const fn date(offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::Date,
        }
    }

    #[must_use]
    pub const fn timestamp(offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::Timestamp,
        }
    }

    #[must_use]
    pub const fn duration(offset: usize, units_offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::Duration { units_offset },
        }
    }

    #[must_use]
    pub const fn work(offset: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::Work,
        }
    }

    #[must_use]
    pub const fn scaled(offset: usize, width: IntWidth, divisor: f64) -> Self {
        Self {
            offset,
            kind: FieldKind::Scaled { width, divisor },
        }
    }

    #[must_use]
    pub const fn flag(offset: usize, mask: u16) -> Self {
        Self {
            offset,
            kind: FieldKind::Flag { mask },
        }
    }

    #[must_use]
    pub const fn text(offset: usize, max_bytes: usize) -> Self {
        Self {
            offset,
            kind: FieldKind::Text { max_bytes },
        }
    }

    /// Bytes the field occupies in the fixed record.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self.kind {
            FieldKind::U8 => 1,
            FieldKind::U16 | FieldKind::Date | FieldKind::Flag { .. } => 2,
            FieldKind::I32 | FieldKind::Timestamp => 4,
            FieldKind::Duration { .. } => 4,
            FieldKind::F64 { .. } | FieldKind::Work => 8,
            FieldKind::Scaled { width, .. } => width.len(),
            FieldKind::Text { max_bytes } => max_bytes,
        }
    }
}

/// Schema of one logical record table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    /// Short label used in logs and errors.
    pub label: &'static str,
    pub directory: &'static str,
    pub fixed_data: &'static str,
    /// Stream whose header carries the record count; absent means the
    /// count is the fixed block length divided by the stride.
    pub fixed_meta: Option<&'static str>,
    pub var: Option<VarSource>,
    pub stride: usize,
    /// Stride used when the fixed block is not a whole number of `stride`
    /// records.
    pub alternate_stride: Option<usize>,
    pub key: FieldDef,
    /// Key value marking a deleted or unused record.
    pub sentinel: Option<i64>,
    /// Flag marking a deleted record; such records are skipped like
    /// sentinels.
    pub deleted: Option<FieldDef>,
    /// Absence or truncation of this table aborts the read.
    pub required: bool,
    /// Fixed block is XOR-obfuscated in protected files.
    pub obfuscated: bool,
}

impl TableLayout {
    #[must_use]
    pub fn path(&self, stream: &str) -> String {
        format!("{}/{stream}", self.directory)
    }

    /// Record stride for a fixed block of `len` bytes.
    #[must_use]
    pub fn stride_for(&self, len: usize) -> usize {
        match self.alternate_stride {
            Some(alternate) if len % self.stride != 0 => alternate,
            _ => self.stride,
        }
    }
}

/// Location of a property blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyLayout {
    pub stream: &'static str,
    pub header_len: usize,
    /// Offset of the `u16` entry count in the header.
    pub count_offset: usize,
    pub obfuscated: bool,
}

/// A named custom text field stored as variable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomField {
    pub name: &'static str,
    pub key: VarKey,
}

/// Encoding of a variable-data text blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Nul-terminated UTF-16LE.
    Wide,
    /// Nul-terminated single-byte text.
    Ansi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarText {
    pub key: VarKey,
    pub encoding: TextEncoding,
}

impl VarText {
    #[must_use]
    pub const fn wide(key: u16) -> Self {
        Self {
            key: VarKey(key),
            encoding: TextEncoding::Wide,
        }
    }

    #[must_use]
    pub const fn ansi(key: u16) -> Self {
        Self {
            key: VarKey(key),
            encoding: TextEncoding::Ansi,
        }
    }
}

/// Layout of the per-weekday and exception blocks inside calendar data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekLayout {
    /// Offset of the Sunday block.
    pub days_offset: usize,
    pub day_len: usize,
    pub flag_offset: usize,
    pub count_offset: usize,
    pub starts_offset: usize,
    pub durations_offset: usize,
    pub max_periods: usize,
    pub exception_count_offset: usize,
    pub exceptions_offset: usize,
    pub exception: ExceptionLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionLayout {
    pub len: usize,
    pub from_offset: usize,
    pub to_offset: usize,
    pub count_offset: usize,
    pub starts_offset: usize,
    pub durations_offset: usize,
    pub name: Option<ExceptionName>,
}

/// Exception name: an `i32` byte length inside the block and UTF-16LE text
/// after it, padded to a multiple of four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionName {
    pub len_offset: usize,
    pub offset: usize,
}

/// Calendar hour blocks of Project 2000 and later.
pub const STANDARD_WEEK: WeekLayout = WeekLayout {
    days_offset: 0,
    day_len: 60,
    flag_offset: 0,
    count_offset: 2,
    starts_offset: 8,
    durations_offset: 20,
    max_periods: 5,
    exception_count_offset: 420,
    exceptions_offset: 424,
    exception: ExceptionLayout {
        len: 92,
        from_offset: 0,
        to_offset: 2,
        count_offset: 14,
        starts_offset: 20,
        durations_offset: 32,
        name: Some(ExceptionName {
            len_offset: 88,
            offset: 92,
        }),
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarLayout {
    pub table: TableLayout,
    pub parent: FieldDef,
    pub resource: Option<FieldDef>,
    pub name: VarKey,
    pub hours: VarKey,
    pub week: WeekLayout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceLayout {
    pub table: TableLayout,
    pub id: FieldDef,
    pub calendar: FieldDef,
    pub standard_rate: FieldDef,
    pub overtime_rate: FieldDef,
    pub cost: FieldDef,
    pub max_units: FieldDef,
    pub material: Option<FieldDef>,
    pub name: VarKey,
    pub initials: VarKey,
    pub group: VarKey,
    pub email: VarKey,
    pub custom: &'static [CustomField],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskLayout {
    pub table: TableLayout,
    pub id: FieldDef,
    /// Absent when the hierarchy is implied by outline levels in id order.
    pub parent: Option<FieldDef>,
    pub outline_level: FieldDef,
    pub milestone: FieldDef,
    pub start: FieldDef,
    pub finish: FieldDef,
    pub actual_start: FieldDef,
    pub actual_finish: FieldDef,
    pub duration: FieldDef,
    pub percent_complete: FieldDef,
    pub work: FieldDef,
    pub actual_work: FieldDef,
    pub cost: FieldDef,
    pub calendar: Option<FieldDef>,
    pub constraint_type: FieldDef,
    pub constraint_date: FieldDef,
    pub name: VarKey,
    pub notes: VarText,
    pub wbs: VarKey,
    pub custom: &'static [CustomField],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentLayout {
    pub table: TableLayout,
    pub task: FieldDef,
    pub resource: FieldDef,
    pub start: FieldDef,
    pub finish: FieldDef,
    pub work: FieldDef,
    pub actual_work: FieldDef,
    pub cost: FieldDef,
    pub units: FieldDef,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationLayout {
    pub table: TableLayout,
    pub predecessor: FieldDef,
    pub successor: FieldDef,
    pub kind: FieldDef,
    pub lag: FieldDef,
}

/// Where a column's stored title lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnTitle {
    /// Inline text inside the column record.
    Inline(FieldDef),
    /// `u16` offset of the text from the start of the column blob; zero
    /// means no title.
    AtOffset(FieldDef),
}

/// How alignment bytes are coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentCodes {
    /// Low nibble: 0 left, 1 center, otherwise right.
    Nibble,
    /// 32 left, 33 center, otherwise right.
    Character,
}

/// Column records inside a table's column blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    /// `u16` holding the column count, stored minus `count_bias`.
    pub count_offset: usize,
    pub count_bias: usize,
    pub first_offset: usize,
    pub stride: usize,
    pub field: FieldDef,
    pub width: FieldDef,
    pub title_alignment: FieldDef,
    pub data_alignment: FieldDef,
    pub alignment_codes: AlignmentCodes,
    pub title: ColumnTitle,
}

/// How a table tells resource tables from task tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceFlag {
    Field(FieldDef),
    /// The first column's field code is zero.
    FirstColumnZero,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableDefinitionLayout {
    pub table: TableLayout,
    pub name: FieldDef,
    pub resource_flag: ResourceFlag,
    /// Column blob keys in order of preference.
    pub column_keys: &'static [VarKey],
    pub columns: ColumnLayout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLayout {
    pub table: TableLayout,
    pub name: FieldDef,
    pub split: FieldDef,
    pub view_type: FieldDef,
    pub properties: VarKey,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterLayout {
    pub table: TableLayout,
    pub name: FieldDef,
    /// Filters without a definition blob are skipped.
    pub definition: VarKey,
    /// Byte of the definition blob.
    pub show_related_summary_rows: FieldDef,
}

/// Clause records inside a group definition blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClauseLayout {
    pub count: FieldDef,
    pub first_offset: usize,
    pub stride: usize,
    /// Bytes a clause must have available to be decoded.
    pub min_len: usize,
    /// `i32` field id: code in the low 16 bits, class in the top byte.
    pub field: FieldDef,
    pub ascending: FieldDef,
    pub group_on: FieldDef,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupLayout {
    pub table: TableLayout,
    pub name: FieldDef,
    /// Groups without a definition blob are skipped.
    pub definition: VarKey,
    pub show_summary_tasks: FieldDef,
    pub clauses: ClauseLayout,
}

/// Complete descriptor set of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatLayout {
    pub generation: FileGeneration,
    pub dates: DateEncoding,
    /// Root property stream holding protection settings.
    pub document_properties: Option<PropertyLayout>,
    pub project_properties: PropertyLayout,
    pub calendars: CalendarLayout,
    pub resources: ResourceLayout,
    pub tasks: TaskLayout,
    pub relations: RelationLayout,
    pub assignments: AssignmentLayout,
    pub tables: TableDefinitionLayout,
    pub views: ViewLayout,
    pub filters: Option<FilterLayout>,
    pub groups: Option<GroupLayout>,
}

impl FormatLayout {
    /// Record tables in build order.
    #[must_use]
    pub fn record_tables(&self) -> Vec<&TableLayout> {
        let mut tables = vec![
            &self.calendars.table,
            &self.resources.table,
            &self.tasks.table,
            &self.relations.table,
            &self.assignments.table,
            &self.tables.table,
            &self.views.table,
        ];
        tables.extend(self.filters.as_ref().map(|f| &f.table));
        tables.extend(self.groups.as_ref().map(|g| &g.table));
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::generation_tag;

    fn fields_fit(table: &TableLayout, fields: &[Option<FieldDef>]) {
        let key = Some(table.key);
        for field in fields.iter().chain([&key, &table.deleted]).flatten() {
            assert!(
                field.offset + field.width() <= table.stride,
                "{} field at {} overruns stride {}",
                table.label,
                field.offset,
                table.stride
            );
        }
        if let Some(VarSource::Deferred { pointers, .. }) = table.var {
            for pointer in pointers {
                assert!(pointer.offset + 4 <= table.stride, "{} pointer", table.label);
            }
        }
    }

    #[test]
    fn every_field_lies_inside_its_record() {
        for entry in SUPPORTED_FORMATS {
            let layout = entry.generation.layout();
            assert_eq!(layout.generation, entry.generation);

            let t = &layout.tasks;
            fields_fit(
                &t.table,
                &[
                    Some(t.id),
                    t.parent,
                    Some(t.outline_level),
                    Some(t.milestone),
                    Some(t.start),
                    Some(t.finish),
                    Some(t.actual_start),
                    Some(t.actual_finish),
                    Some(t.duration),
                    Some(t.percent_complete),
                    Some(t.work),
                    Some(t.actual_work),
                    Some(t.cost),
                    t.calendar,
                    Some(t.constraint_type),
                    Some(t.constraint_date),
                ],
            );

            let r = &layout.resources;
            fields_fit(
                &r.table,
                &[
                    Some(r.id),
                    Some(r.calendar),
                    Some(r.standard_rate),
                    Some(r.overtime_rate),
                    Some(r.cost),
                    Some(r.max_units),
                    r.material,
                ],
            );

            let a = &layout.assignments;
            fields_fit(
                &a.table,
                &[
                    Some(a.task),
                    Some(a.resource),
                    Some(a.start),
                    Some(a.finish),
                    Some(a.work),
                    Some(a.actual_work),
                    Some(a.cost),
                    Some(a.units),
                ],
            );

            let c = &layout.calendars;
            fields_fit(&c.table, &[Some(c.parent), c.resource]);

            let rel = &layout.relations;
            fields_fit(
                &rel.table,
                &[
                    Some(rel.predecessor),
                    Some(rel.successor),
                    Some(rel.kind),
                    Some(rel.lag),
                ],
            );

            let tables = &layout.tables;
            let flag = match tables.resource_flag {
                ResourceFlag::Field(field) => Some(field),
                ResourceFlag::FirstColumnZero => None,
            };
            fields_fit(&tables.table, &[Some(tables.name), flag]);

            let v = &layout.views;
            fields_fit(&v.table, &[Some(v.name), Some(v.split), Some(v.view_type)]);

            if let Some(f) = &layout.filters {
                fields_fit(&f.table, &[Some(f.name)]);
            }
            if let Some(g) = &layout.groups {
                fields_fit(&g.table, &[Some(g.name)]);
                let clauses = &g.clauses;
                for field in [clauses.field, clauses.ascending, clauses.group_on] {
                    assert!(field.offset + field.width() <= clauses.min_len);
                }
                assert!(clauses.min_len <= clauses.stride);
            }
        }
    }

    fn strides(table: &TableLayout) -> (usize, Option<usize>) {
        (table.stride, table.alternate_stride)
    }

    #[test]
    fn record_strides_match_each_generation() {
        let mpp8 = FileGeneration::Mpp8.layout();
        assert_eq!(strides(&mpp8.calendars.table), (36, None));
        assert_eq!(strides(&mpp8.resources.table), (196, None));
        assert_eq!(strides(&mpp8.tasks.table), (316, Some(366)));
        assert_eq!(strides(&mpp8.relations.table), (36, None));
        assert_eq!(strides(&mpp8.assignments.table), (204, Some(238)));
        assert_eq!(strides(&mpp8.views.table), (138, None));
        assert_eq!(strides(&mpp8.tables.table), (126, None));
        assert!(mpp8.filters.is_none());
        assert!(mpp8.groups.is_none());

        let mpp9 = FileGeneration::Mpp9.layout();
        assert_eq!(strides(&mpp9.views.table), (122, None));
        assert_eq!(strides(&mpp9.tables.table), (115, Some(110)));
        assert_eq!(mpp9.tables.table.fixed_meta, None);
        let filters = mpp9.filters.as_ref().map(|f| strides(&f.table));
        assert_eq!(filters, Some((115, Some(110))));
        let groups = mpp9.groups.as_ref().map(|g| strides(&g.table));
        assert_eq!(groups, Some((110, None)));

        for generation in [FileGeneration::Mpp12, FileGeneration::Mpp14] {
            let layout = generation.layout();
            assert_eq!(strides(&layout.views.table), (138, None));
            assert_eq!(strides(&layout.tables.table), (230, None));
            assert_eq!(layout.tables.columns.stride, 115);
        }
    }

    #[test]
    fn alternate_stride_applies_to_uneven_blocks() {
        let tasks = &FileGeneration::Mpp8.layout().tasks.table;
        assert_eq!(tasks.stride_for(316 * 3), 316);
        assert_eq!(tasks.stride_for(366 * 2), 366);
        assert_eq!(tasks.stride_for(0), 316);
        let calendars = &FileGeneration::Mpp8.layout().calendars.table;
        assert_eq!(calendars.stride_for(37), 36);
    }

    #[test]
    fn formats_resolve_through_the_table() {
        assert_eq!(FileGeneration::from_format("MSProject.MPT9"), Some(FileGeneration::Mpp9));
        assert_eq!(
            FileGeneration::from_format("MSProject.GLOBAL14"),
            Some(FileGeneration::Mpp14)
        );
        assert_eq!(FileGeneration::from_format("MSProject.MPP11"), None);
        assert_eq!(FileGeneration::from_format("Foo.Bar9"), None);
        for entry in SUPPORTED_FORMATS {
            let tag = Some(entry.generation.tag());
            assert!(entry.formats.iter().all(|f| generation_tag(f) == tag));
        }
        assert_eq!(FileGeneration::Mpp12.to_string(), "MPP12");
    }

    #[test]
    fn epochs_are_valid_dates() {
        for entry in SUPPORTED_FORMATS {
            assert!(entry.generation.layout().dates.epoch_date().is_some());
        }
    }
}
