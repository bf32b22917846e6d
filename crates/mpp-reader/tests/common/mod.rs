//! Synthetic project files built from the layout descriptors.
//!
//! Records are written through the same `FieldDef`s the decoder reads, so a
//! fixture is valid for whichever generation it is built for.

#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use mpp_cfb::CompoundFileWriter;
use mpp_reader::decode::Obfuscation;
use mpp_reader::layout::{
    AlignmentCodes, ClauseLayout, ColumnLayout, ColumnTitle, DateEncoding, FieldDef, FieldKind,
    FileGeneration, FormatLayout, IdWidth, IntWidth, PointerTarget, PropertyLayout, ResourceFlag,
    TableLayout, TextEncoding, VarIndexLayout, VarKey, VarPointer, VarSource, VarText,
};
use mpp_reader::props::keys;
use mpp_reader::version::COMP_OBJ_STREAM;

pub fn utf16(text: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    bytes.extend([0, 0]);
    bytes
}

pub fn at(date: (i32, u32, u32), hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn put_width(buf: &mut [u8], offset: usize, width: IdWidth, value: u32) {
    put(buf, offset, &value.to_le_bytes()[..width.len()]);
}

/// Write an integer through a field definition.
pub fn put_int(buf: &mut [u8], field: &FieldDef, value: i64) {
    match field.kind {
        FieldKind::U8 => put(buf, field.offset, &[value as u8]),
        FieldKind::U16 | FieldKind::Date => put(buf, field.offset, &(value as u16).to_le_bytes()),
        FieldKind::I32 | FieldKind::Duration { .. } => {
            put(buf, field.offset, &(value as i32).to_le_bytes());
        }
        FieldKind::Timestamp => put(buf, field.offset, &(value as u32).to_le_bytes()),
        FieldKind::Flag { mask } => {
            let current = u16::from_le_bytes([buf[field.offset], buf[field.offset + 1]]);
            let next = if value != 0 {
                current | mask
            } else {
                current & !mask
            };
            put(buf, field.offset, &next.to_le_bytes());
        }
        FieldKind::F64 { divisor } => {
            put(buf, field.offset, &(value as f64 * divisor).to_le_bytes());
        }
        FieldKind::Work => put(buf, field.offset, &(value as f64).to_le_bytes()),
        FieldKind::Scaled { width, .. } => match width {
            IntWidth::U16 => put(buf, field.offset, &(value as u16).to_le_bytes()),
            IntWidth::I32 => put(buf, field.offset, &(value as i32).to_le_bytes()),
            IntWidth::U48 => put(buf, field.offset, &(value as u64).to_le_bytes()[..6]),
        },
        FieldKind::Text { .. } => panic!("text field written as integer"),
    }
}

fn put_text(buf: &mut [u8], field: &FieldDef, text: &str) {
    let FieldKind::Text { max_bytes } = field.kind else {
        panic!("not a text field");
    };
    let bytes = utf16(text);
    assert!(bytes.len() <= max_bytes, "text too long for field");
    put(buf, field.offset, &bytes);
}

fn encode_timestamp(dates: &DateEncoding, value: NaiveDateTime) -> [u8; 4] {
    let epoch = dates.epoch_date().expect("epoch");
    let days = (value.date() - epoch).num_days();
    let minutes = i64::from(value.hour() * 60 + value.minute());
    let time = (minutes * dates.ticks_per_minute) as u16;
    let mut out = [0u8; 4];
    out[..2].copy_from_slice(&time.to_le_bytes());
    out[2..].copy_from_slice(&(days as u16).to_le_bytes());
    out
}

/// Property blob: header, then `[size][key][bytes]` entries padded to even.
pub fn props_blob(layout: &PropertyLayout, entries: &[(i32, Vec<u8>)]) -> Vec<u8> {
    let mut data = vec![0u8; layout.header_len];
    put(&mut data, layout.count_offset, &(entries.len() as u16).to_le_bytes());
    for (key, bytes) in entries {
        data.extend((bytes.len() as i32).to_le_bytes());
        data.extend(key.to_le_bytes());
        data.extend(bytes);
        if bytes.len() % 2 == 1 {
            data.push(0);
        }
    }
    data
}

/// One fixed record plus its variable blobs.
#[derive(Debug, Clone)]
pub struct Rec {
    key: i32,
    fixed: Vec<u8>,
    var: Vec<(VarKey, Vec<u8>)>,
    dates: &'static DateEncoding,
}

impl Rec {
    pub fn new(layout: &'static FormatLayout, table: &TableLayout, key: i32) -> Self {
        let mut fixed = vec![0u8; table.stride];
        put_int(&mut fixed, &table.key, i64::from(key));
        Self {
            key,
            fixed,
            var: Vec::new(),
            dates: &layout.dates,
        }
    }

    pub fn int(mut self, field: &FieldDef, value: i64) -> Self {
        put_int(&mut self.fixed, field, value);
        self
    }

    /// Write `value` when the layout has the field.
    pub fn int_opt(self, field: &Option<FieldDef>, value: i64) -> Self {
        match field {
            Some(field) => self.int(field, value),
            None => self,
        }
    }

    pub fn flag(self, field: &FieldDef, value: bool) -> Self {
        self.int(field, i64::from(value))
    }

    pub fn flag_opt(self, field: &Option<FieldDef>, value: bool) -> Self {
        self.int_opt(field, i64::from(value))
    }

    pub fn float(mut self, field: &FieldDef, value: f64) -> Self {
        match field.kind {
            FieldKind::F64 { divisor } => {
                put(&mut self.fixed, field.offset, &(value * divisor).to_le_bytes());
                self
            }
            FieldKind::Scaled { divisor, .. } => {
                let raw = (value * divisor).round() as i64;
                self.int(field, raw)
            }
            _ => panic!("not a float field"),
        }
    }

    pub fn work_hours(mut self, field: &FieldDef, hours: f64) -> Self {
        match field.kind {
            FieldKind::Work => {
                put(&mut self.fixed, field.offset, &(hours * 60_000.0).to_le_bytes());
                self
            }
            FieldKind::Scaled { .. } => self.float(field, hours),
            _ => panic!("not a work field"),
        }
    }

    pub fn timestamp(mut self, field: &FieldDef, value: NaiveDateTime) -> Self {
        let bytes = encode_timestamp(self.dates, value);
        put(&mut self.fixed, field.offset, &bytes);
        self
    }

    /// Duration in raw ticks with a units code.
    pub fn duration(mut self, field: &FieldDef, ticks: i32, units: u16) -> Self {
        let FieldKind::Duration { units_offset } = field.kind else {
            panic!("not a duration field");
        };
        put(&mut self.fixed, field.offset, &ticks.to_le_bytes());
        put(&mut self.fixed, units_offset, &units.to_le_bytes());
        self
    }

    pub fn text(mut self, field: &FieldDef, text: &str) -> Self {
        put_text(&mut self.fixed, field, text);
        self
    }

    pub fn var(mut self, key: VarKey, bytes: Vec<u8>) -> Self {
        self.var.push((key, bytes));
        self
    }

    pub fn var_text(self, key: VarKey, text: &str) -> Self {
        self.var(key, utf16(text))
    }

    /// Text blob in the encoding the layout declares.
    pub fn var_string(self, text: VarText, value: &str) -> Self {
        let bytes = match text.encoding {
            TextEncoding::Wide => utf16(value),
            TextEncoding::Ansi => {
                let mut bytes = value.as_bytes().to_vec();
                bytes.push(0);
                bytes
            }
        };
        self.var(text.key, bytes)
    }

    fn blob(&self, key: VarKey) -> Option<&[u8]> {
        self.var
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

#[derive(Debug, Clone)]
struct TableFixture {
    layout: &'static TableLayout,
    records: Vec<Rec>,
    declared: Option<u32>,
    truncate: usize,
    stride: Option<usize>,
}

/// A project file under construction.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub layout: &'static FormatLayout,
    application: String,
    format: String,
    tables: Vec<TableFixture>,
    document: Vec<(i32, Vec<u8>)>,
    project: Vec<(i32, Vec<u8>)>,
    protection: Option<(u8, u8)>,
    omitted: BTreeSet<String>,
    index_magic: u32,
}

impl Fixture {
    pub fn new(generation: FileGeneration) -> Self {
        let layout = generation.layout();
        let tables = layout
            .record_tables()
            .into_iter()
            .map(|table| TableFixture {
                layout: table,
                records: Vec::new(),
                declared: None,
                truncate: 0,
                stride: None,
            })
            .collect();
        Self {
            layout,
            application: format!("Microsoft Project {}.0", generation.tag()),
            format: format!("MSProject.MPP{}", generation.tag()),
            tables,
            document: Vec::new(),
            project: Vec::new(),
            protection: None,
            omitted: BTreeSet::new(),
            index_magic: INDEX_MAGIC,
        }
    }

    /// Override the format string written to `CompObj`.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    /// Mark the file protected: password flag plus encryption code.
    pub fn with_protection(mut self, flag: u8, code: u8) -> Self {
        self.protection = Some((flag, code));
        self
    }

    pub fn document_property(mut self, key: i32, bytes: Vec<u8>) -> Self {
        self.document.push((key, bytes));
        self
    }

    pub fn project_property(mut self, key: i32, bytes: Vec<u8>) -> Self {
        self.project.push((key, bytes));
        self
    }

    /// Magic number written at the start of every variable index.
    pub fn with_index_magic(mut self, magic: u32) -> Self {
        self.index_magic = magic;
        self
    }

    /// Leave a stream out of the container.
    pub fn omit(mut self, path: String) -> Self {
        self.omitted.insert(path);
        self
    }

    fn table_mut(&mut self, table: &TableLayout) -> &mut TableFixture {
        self.tables
            .iter_mut()
            .find(|t| t.layout.label == table.label)
            .expect("table of this layout")
    }

    pub fn record(mut self, table: &TableLayout, record: Rec) -> Self {
        self.table_mut(table).records.push(record);
        self
    }

    /// Declare a record count in the fixed meta header that differs from
    /// the number of records written.
    pub fn declare_count(mut self, table: &TableLayout, count: u32) -> Self {
        self.table_mut(table).declared = Some(count);
        self
    }

    /// Cut `bytes` off the end of the table's fixed block.
    pub fn truncate(mut self, table: &TableLayout, bytes: usize) -> Self {
        self.table_mut(table).truncate = bytes;
        self
    }

    /// Write every record of the table padded to `stride` bytes.
    pub fn widen(mut self, table: &TableLayout, stride: usize) -> Self {
        self.table_mut(table).stride = Some(stride);
        self
    }

    fn obfuscation(&self) -> Obfuscation {
        self.protection
            .map_or(Obfuscation::NONE, |(flag, code)| Obfuscation::from_code(flag, code))
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = CompoundFileWriter::new();
        let mut add = |path: String, data: Vec<u8>| {
            if !self.omitted.contains(&path) {
                writer.add_stream(path, data).expect("add stream");
            }
        };
        let obfuscation = self.obfuscation();

        add(COMP_OBJ_STREAM.to_string(), self.comp_obj());

        if let Some(layout) = &self.layout.document_properties {
            let mut entries = self.document.clone();
            if let Some((flag, code)) = self.protection {
                entries.push((keys::PASSWORD_FLAG, vec![flag]));
                entries.push((keys::ENCRYPTION_CODE, vec![code]));
            }
            add(layout.stream.to_string(), props_blob(layout, &entries));
        }

        let layout = &self.layout.project_properties;
        let project = props_blob(layout, &self.project);
        let project = if layout.obfuscated {
            obfuscation.apply(&project).into_owned()
        } else {
            project
        };
        add(layout.stream.to_string(), project);

        for table in &self.tables {
            if table.records.is_empty() && table.declared.is_none() {
                continue;
            }
            for (path, data) in table_streams(table, obfuscation, self.index_magic) {
                add(path, data);
            }
        }
        writer.finish().expect("container")
    }

    fn comp_obj(&self) -> Vec<u8> {
        let mut data = vec![0u8; 28];
        for s in [self.application.as_str(), self.format.as_str(), "MSProject.Project"] {
            data.extend(((s.len() + 1) as u32).to_le_bytes());
            data.extend(s.as_bytes());
            data.push(0);
        }
        data
    }
}

/// Data bytes in the first and later blocks of a deferred chain.
const FIRST_BLOCK: usize = 28;
const NEXT_BLOCK: usize = 32;

/// Deferred data stream: chained blocks addressed by `-1 - offset`.
struct DeferredData {
    bytes: Vec<u8>,
}

impl DeferredData {
    fn new() -> Self {
        Self { bytes: vec![0u8; 4] }
    }

    /// Append `blob` as a chain of blocks and return its stored pointer.
    fn push(&mut self, blob: &[u8]) -> i32 {
        let data = &mut self.bytes;
        let start = data.len();
        let (first, mut rest) = blob.split_at(blob.len().min(FIRST_BLOCK));
        let link = if rest.is_empty() {
            -1
        } else {
            (start + 8 + FIRST_BLOCK) as i32
        };
        data.extend(link.to_le_bytes());
        data.extend((blob.len() as i32).to_le_bytes());
        data.extend(first);
        data.resize(start + 8 + FIRST_BLOCK, 0);
        while !rest.is_empty() {
            let (block, tail) = rest.split_at(rest.len().min(NEXT_BLOCK));
            let here = data.len();
            let link = if tail.is_empty() {
                -1
            } else {
                (here + 4 + NEXT_BLOCK) as i32
            };
            data.extend(link.to_le_bytes());
            data.extend(block);
            data.resize(here + 4 + NEXT_BLOCK, 0);
            rest = tail;
        }
        -1 - start as i32
    }

    /// Pointer stored for `pointer` in `record`; `-1` when it has no blob.
    fn pointer(&mut self, record: &Rec, pointer: &VarPointer) -> i32 {
        match pointer.target {
            PointerTarget::Blob(key) => record.blob(key).map_or(-1, |blob| self.push(blob)),
            PointerTarget::Extended(keys) => {
                let mut extended = Vec::new();
                for &key in keys {
                    if let Some(blob) = record.blob(key) {
                        let inner = self.push(blob);
                        extended.extend(4i32.to_le_bytes());
                        extended.extend(i32::from(key.0).to_le_bytes());
                        extended.extend(inner.to_le_bytes());
                    }
                }
                if extended.is_empty() {
                    -1
                } else {
                    self.push(&extended)
                }
            }
            PointerTarget::Nested { key, offset } => match record.blob(key) {
                Some(blob) => {
                    let inner = self.push(blob);
                    let mut outer = vec![0u8; offset + 4];
                    put(&mut outer, offset, &inner.to_le_bytes());
                    self.push(&outer)
                }
                None => -1,
            },
        }
    }
}

fn table_streams(
    table: &TableFixture,
    obfuscation: Obfuscation,
    index_magic: u32,
) -> Vec<(String, Vec<u8>)> {
    let layout = table.layout;
    let mut records: Vec<Vec<u8>> = table.records.iter().map(|r| r.fixed.clone()).collect();
    let mut streams = Vec::new();

    match layout.var {
        Some(VarSource::Indexed {
            index,
            data,
            layout: entries,
        }) => {
            let mut blobs = Vec::new();
            let mut refs = Vec::new();
            for record in &table.records {
                for (key, bytes) in &record.var {
                    refs.push((record.key as u32, key.0 as u32, blobs.len() as u32));
                    blobs.extend((bytes.len() as u32).to_le_bytes());
                    blobs.extend(bytes);
                }
            }
            streams.push((layout.path(index), var_index(&entries, index_magic, &refs)));
            streams.push((layout.path(data), blobs));
        }
        Some(VarSource::Deferred { data, pointers }) => {
            let mut deferred = DeferredData::new();
            for (fixed, record) in records.iter_mut().zip(&table.records) {
                for pointer in pointers {
                    let stored = deferred.pointer(record, pointer);
                    put(fixed, pointer.offset, &stored.to_le_bytes());
                }
            }
            streams.push((layout.path(data), deferred.bytes));
        }
        None => {}
    }

    if let Some(stride) = table.stride {
        for record in &mut records {
            record.resize(stride, 0);
        }
    }
    let mut fixed: Vec<u8> = records.concat();
    fixed.truncate(fixed.len().saturating_sub(table.truncate));
    let fixed = if layout.obfuscated {
        obfuscation.apply(&fixed).into_owned()
    } else {
        fixed
    };
    streams.push((layout.path(layout.fixed_data), fixed));

    if let Some(meta) = layout.fixed_meta {
        let count = table.declared.unwrap_or(table.records.len() as u32);
        let mut header = vec![0u8; 16];
        put(&mut header, 0, &INDEX_MAGIC.to_le_bytes());
        put(&mut header, 8, &count.to_le_bytes());
        streams.push((layout.path(meta), header));
    }
    streams
}

/// Magic number opening fixed meta and variable index streams.
pub const INDEX_MAGIC: u32 = 0xFADF_ADBA;

fn var_index(layout: &VarIndexLayout, magic: u32, refs: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut index = vec![0u8; layout.header_len];
    put(&mut index, 0, &magic.to_le_bytes());
    put(&mut index, layout.count_offset, &(refs.len() as u32).to_le_bytes());
    for &(id, key, offset) in refs {
        let mut entry = vec![0u8; layout.entry_len];
        put_width(&mut entry, layout.id_offset, layout.id_width, id);
        put_width(&mut entry, layout.key_offset, layout.key_width, key);
        put(&mut entry, layout.data_offset, &offset.to_le_bytes());
        index.extend(entry);
    }
    index
}

/// Column blob for a presentation table: `(field, width, title)` triples.
/// Both alignments are written as left.
pub fn column_blob(layout: &ColumnLayout, columns: &[(u16, u8, &str)]) -> Vec<u8> {
    let mut blob = vec![0u8; layout.first_offset];
    let stored = (columns.len() - layout.count_bias) as u16;
    put(&mut blob, layout.count_offset, &stored.to_le_bytes());
    let left = match layout.alignment_codes {
        AlignmentCodes::Nibble => 0,
        AlignmentCodes::Character => 32,
    };
    let mut titles = Vec::new();
    for &(field, width, title) in columns {
        let mut column = vec![0u8; layout.stride];
        put_int(&mut column, &layout.field, i64::from(field));
        put_int(&mut column, &layout.width, i64::from(width));
        put_int(&mut column, &layout.title_alignment, left);
        put_int(&mut column, &layout.data_alignment, left);
        if !title.is_empty() {
            titles.push((blob.len(), title));
            if let ColumnTitle::Inline(field) = layout.title {
                put_text(&mut column, &field, title);
            }
        }
        blob.extend(column);
    }
    if let ColumnTitle::AtOffset(field) = layout.title {
        for (column, title) in titles {
            let offset = blob.len() as i64;
            put_int(&mut blob[column..], &field, offset);
            blob.extend(utf16(title));
        }
    }
    blob
}

/// Group definition blob: the summary-task flag and `(field id, ascending,
/// group on)` clauses.
pub fn group_blob(
    show_summary_tasks: &FieldDef,
    layout: &ClauseLayout,
    clauses: &[(i32, bool, u16)],
) -> Vec<u8> {
    let mut blob = vec![0u8; layout.first_offset + clauses.len() * layout.stride];
    put_int(&mut blob, show_summary_tasks, 1);
    put_int(&mut blob, &layout.count, clauses.len() as i64);
    for (i, &(field, ascending, group_on)) in clauses.iter().enumerate() {
        let clause = &mut blob[layout.first_offset + i * layout.stride..];
        put_int(clause, &layout.field, i64::from(field));
        put_int(clause, &layout.ascending, i64::from(ascending));
        put_int(clause, &layout.group_on, i64::from(group_on));
    }
    blob
}

/// Field id of a task field in a group clause.
pub const fn task_field(code: u16) -> i32 {
    0x0B00_0000 | code as i32
}

/// Field id of a resource field in a group clause.
pub const fn resource_field(code: u16) -> i32 {
    0x0C00_0000 | code as i32
}

/// The sample schedule used across tests: a standard calendar, two
/// resources, a summary task with three children, relations, assignments,
/// an entry table and a Gantt view, plus one deleted task record. Where the
/// generation stores them, a filter and a group are saved too.
pub fn sample(generation: FileGeneration) -> Fixture {
    let fixture = Fixture::new(generation);
    let layout = fixture.layout;
    let c = &layout.calendars;
    let r = &layout.resources;
    let t = &layout.tasks;
    let rel = &layout.relations;
    let a = &layout.assignments;
    let tables = &layout.tables;
    let v = &layout.views;

    let task = |uid: i32, id: i32, name: &str, parent: i32| {
        Rec::new(layout, &t.table, uid)
            .int(&t.id, i64::from(id))
            .int_opt(&t.parent, i64::from(parent))
            .int(&t.outline_level, if parent < 0 { 1 } else { 2 })
            .int_opt(&t.calendar, -1)
            .var_text(t.name, name)
    };
    let view_props = props_blob(
        &layout.project_properties,
        &[(keys::VIEW_TABLE_NAME, utf16("&Entry"))],
    );
    let usage = Rec::new(layout, &tables.table, 2)
        .text(&tables.name, "&Usage")
        .var(
            tables.column_keys[0],
            column_blob(&tables.columns, &[(0, 30, ""), (1, 120, "")]),
        );
    let usage = match tables.resource_flag {
        ResourceFlag::Field(field) => usage.flag(&field, true),
        ResourceFlag::FirstColumnZero => usage,
    };

    let fixture = fixture
        .project_property(keys::DEFAULT_CALENDAR_NAME, utf16("Standard"))
        .project_property(keys::MINUTES_PER_DAY, 480i32.to_le_bytes().to_vec())
        .project_property(keys::CURRENCY_SYMBOL, utf16("$"))
        .record(
            &c.table,
            Rec::new(layout, &c.table, 1)
                .int(&c.parent, -1)
                .int_opt(&c.resource, -1)
                .var_text(c.name, "Standard"),
        )
        .record(
            &r.table,
            Rec::new(layout, &r.table, 1)
                .int(&r.id, 1)
                .int(&r.calendar, -1)
                .float(&r.standard_rate, 50.0)
                .float(&r.max_units, 100.0)
                .var_text(r.name, "Ada")
                .var_text(r.initials, "A"),
        )
        .record(
            &r.table,
            Rec::new(layout, &r.table, 2)
                .int(&r.id, 2)
                .int(&r.calendar, -1)
                .flag_opt(&r.material, true)
                .var_text(r.name, "Concrete"),
        )
        .record(
            &t.table,
            task(1, 1, "Build", -1)
                .timestamp(&t.start, at((2024, 3, 4), 8))
                .duration(&t.duration, 3 * 4800, 7),
        )
        .record(
            &t.table,
            task(2, 2, "Design", 1)
                .timestamp(&t.start, at((2024, 3, 4), 8))
                .timestamp(&t.finish, at((2024, 3, 5), 17))
                .duration(&t.duration, 2 * 4800, 7)
                .work_hours(&t.work, 16.0)
                .int(&t.percent_complete, 50)
                .var_text(t.custom[0].key, "phase one"),
        )
        .record(&t.table, task(3, 3, "Pour", 1).int_opt(&t.calendar, 1))
        .record(&t.table, Rec::new(layout, &t.table, -1))
        .record(
            &t.table,
            task(4, 4, "Done", 1).flag(&t.milestone, true),
        )
        .record(
            &rel.table,
            Rec::new(layout, &rel.table, 1)
                .int(&rel.predecessor, 2)
                .int(&rel.successor, 3)
                .int(&rel.kind, 1),
        )
        .record(
            &rel.table,
            Rec::new(layout, &rel.table, 2)
                .int(&rel.predecessor, 3)
                .int(&rel.successor, 4)
                .int(&rel.kind, 3)
                .duration(&rel.lag, 600, 5),
        )
        .record(
            &a.table,
            Rec::new(layout, &a.table, 1)
                .int(&a.task, 2)
                .int(&a.resource, 1)
                .work_hours(&a.work, 16.0)
                .float(&a.units, 100.0),
        )
        .record(
            &a.table,
            Rec::new(layout, &a.table, 2)
                .int(&a.task, 3)
                .int(&a.resource, 2),
        )
        .record(
            &tables.table,
            Rec::new(layout, &tables.table, 1)
                .text(&tables.name, "&Entry")
                .var(
                    tables.column_keys[0],
                    column_blob(
                        &tables.columns,
                        &[(23, 40, ""), (14, 200, "Task Name"), (35, 90, ""), (36, 90, "")],
                    ),
                ),
        )
        .record(&tables.table, usage)
        .record(
            &v.table,
            Rec::new(layout, &v.table, 1)
                .text(&v.name, "&Gantt Chart")
                .int(&v.view_type, 1)
                .var(v.properties, view_props),
        )
        .record(
            &v.table,
            Rec::new(layout, &v.table, 2)
                .text(&v.name, "Resource &Sheet")
                .int(&v.view_type, 7),
        );

    let fixture = match &layout.filters {
        Some(f) => {
            let mut definition = vec![0u8; 16];
            put_int(&mut definition, &f.show_related_summary_rows, 1);
            fixture
                .record(
                    &f.table,
                    Rec::new(layout, &f.table, 1)
                        .text(&f.name, "&Incomplete Tasks")
                        .var(f.definition, definition),
                )
                .record(
                    &f.table,
                    Rec::new(layout, &f.table, 2).text(&f.name, "Unsaved"),
                )
        }
        None => fixture,
    };
    match &layout.groups {
        Some(g) => fixture.record(
            &g.table,
            Rec::new(layout, &g.table, 1)
                .text(&g.name, "&Resource")
                .var(
                    g.definition,
                    group_blob(
                        &g.show_summary_tasks,
                        &g.clauses,
                        &[(task_field(14), true, 0), (resource_field(1), false, 2)],
                    ),
                ),
        ),
        None => fixture,
    }
}
