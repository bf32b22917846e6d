//! Project 98 files (`MSProject.MPP8`).
//!
//! Variable data is addressed through pointers embedded in each fixed record
//! rather than a side index. Most text lives behind a per-record extended
//! data blob. There is no root property stream, so these files are never
//! obfuscated, and tasks carry no parent field: the outline is implied by
//! outline levels in id order.

use super::{
    AlignmentCodes, AssignmentLayout, CalendarLayout, ColumnLayout, ColumnTitle, CustomField,
    DateEncoding, ExceptionLayout, FieldDef, FileGeneration, FormatLayout, IntWidth,
    PointerTarget, PropertyLayout, RelationLayout, ResourceFlag, ResourceLayout,
    TableDefinitionLayout, TableLayout, TaskLayout, VarKey, VarPointer, VarSource, VarText,
    ViewLayout, WeekLayout,
};

const FIXED: &str = "FixFix   0";
const DEFERRED: &str = "FixDeferFix   0";

const fn blob(key: u16, offset: usize) -> VarPointer {
    VarPointer {
        offset,
        target: PointerTarget::Blob(VarKey(key)),
    }
}

const fn extended(offset: usize, keys: &'static [VarKey]) -> VarPointer {
    VarPointer {
        offset,
        target: PointerTarget::Extended(keys),
    }
}

const fn deferred(pointers: &'static [VarPointer]) -> Option<VarSource> {
    Some(VarSource::Deferred {
        data: DEFERRED,
        pointers,
    })
}

/// Hundredths stored in six bytes.
const fn long6(offset: usize) -> FieldDef {
    FieldDef::scaled(offset, IntWidth::U48, 100.0)
}

const CALENDAR_NAME: u16 = 1;
const CALENDAR_HOURS: u16 = 8;

const CALENDAR_POINTERS: &[VarPointer] = &[
    blob(CALENDAR_NAME, 20),
    extended(32, &[VarKey(CALENDAR_HOURS)]),
];

const RESOURCE_NAME: u16 = 1;
const RESOURCE_INITIALS: u16 = 3;

const RESOURCE_POINTERS: &[VarPointer] = &[
    blob(RESOURCE_NAME, 156),
    blob(RESOURCE_INITIALS, 160),
    extended(
        192,
        &[
            VarKey(61),
            VarKey(62),
            VarKey(63),
            VarKey(64),
            VarKey(65),
            VarKey(66),
        ],
    ),
];

const TASK_NAME: u16 = 1;

const TASK_POINTERS: &[VarPointer] = &[
    blob(TASK_NAME, 264),
    extended(
        312,
        &[
            VarKey(104),
            VarKey(106),
            VarKey(107),
            VarKey(108),
            VarKey(247),
        ],
    ),
];

const COLUMN_DATA: u16 = 1;

const TABLE_POINTERS: &[VarPointer] = &[VarPointer {
    offset: 122,
    target: PointerTarget::Nested {
        key: VarKey(COLUMN_DATA),
        offset: 8,
    },
}];

const VIEW_PROPERTIES: u16 = 1;

const VIEW_POINTERS: &[VarPointer] = &[blob(VIEW_PROPERTIES, 134)];

const TASK_TEXT: &[CustomField] = &[
    CustomField {
        name: "Text1",
        key: VarKey(106),
    },
    CustomField {
        name: "Text2",
        key: VarKey(107),
    },
    CustomField {
        name: "Text3",
        key: VarKey(108),
    },
];

const RESOURCE_TEXT: &[CustomField] = &[
    CustomField {
        name: "Text1",
        key: VarKey(64),
    },
    CustomField {
        name: "Text2",
        key: VarKey(65),
    },
    CustomField {
        name: "Text3",
        key: VarKey(66),
    },
];

/// Exception count first, then seven 40-byte day blocks, then 44-byte
/// unnamed exception blocks.
const WEEK: WeekLayout = WeekLayout {
    days_offset: 4,
    day_len: 40,
    flag_offset: 0,
    count_offset: 2,
    starts_offset: 8,
    durations_offset: 16,
    max_periods: 4,
    exception_count_offset: 0,
    exceptions_offset: 4 + 7 * 40,
    exception: ExceptionLayout {
        len: 44,
        from_offset: 0,
        to_offset: 2,
        count_offset: 6,
        starts_offset: 12,
        durations_offset: 20,
        name: None,
    },
};

const fn table(
    label: &'static str,
    directory: &'static str,
    stride: usize,
    var: Option<VarSource>,
) -> TableLayout {
    TableLayout {
        label,
        directory,
        fixed_data: FIXED,
        fixed_meta: None,
        var,
        stride,
        alternate_stride: None,
        key: FieldDef::i32(0),
        sentinel: Some(-1),
        deleted: None,
        required: false,
        obfuscated: false,
    }
}

pub(super) static LAYOUT: FormatLayout = FormatLayout {
    generation: FileGeneration::Mpp8,
    dates: DateEncoding {
        epoch: (1983, 12, 31),
        ticks_per_minute: 10,
    },
    document_properties: None,
    project_properties: PropertyLayout {
        stream: "   1/Props",
        header_len: 16,
        count_offset: 12,
        obfuscated: false,
    },
    calendars: CalendarLayout {
        table: table("calendars", "   1/TBkndCal", 36, deferred(CALENDAR_POINTERS)),
        parent: FieldDef::i32(4),
        resource: None,
        name: VarKey(CALENDAR_NAME),
        hours: VarKey(CALENDAR_HOURS),
        week: WEEK,
    },
    resources: ResourceLayout {
        table: TableLayout {
            deleted: Some(FieldDef::u16(164)),
            ..table("resources", "   1/TBkndRsc", 196, deferred(RESOURCE_POINTERS))
        },
        id: FieldDef::i32(4),
        calendar: FieldDef::i32(24),
        standard_rate: FieldDef::f64(36, 1.0),
        overtime_rate: FieldDef::f64(44, 1.0),
        cost: long6(120),
        max_units: FieldDef::scaled(52, IntWidth::I32, 100.0),
        material: None,
        name: VarKey(RESOURCE_NAME),
        initials: VarKey(RESOURCE_INITIALS),
        group: VarKey(61),
        email: VarKey(63),
        custom: RESOURCE_TEXT,
    },
    tasks: TaskLayout {
        table: TableLayout {
            alternate_stride: Some(366),
            deleted: Some(FieldDef::flag(8, 0x0001)),
            required: true,
            ..table("tasks", "   1/TBkndTask", 316, deferred(TASK_POINTERS))
        },
        id: FieldDef::i32(4),
        parent: None,
        outline_level: FieldDef::u16(48),
        milestone: FieldDef::flag(12, 0x0001),
        start: FieldDef::timestamp(96),
        finish: FieldDef::timestamp(20),
        actual_start: FieldDef::timestamp(104),
        actual_finish: FieldDef::timestamp(108),
        duration: FieldDef::duration(68, 72),
        percent_complete: FieldDef::u16(130),
        work: long6(168),
        actual_work: long6(180),
        cost: long6(222),
        calendar: None,
        constraint_type: FieldDef::u16(88),
        constraint_date: FieldDef::timestamp(120),
        name: VarKey(TASK_NAME),
        notes: VarText::ansi(247),
        wbs: VarKey(104),
        custom: TASK_TEXT,
    },
    relations: RelationLayout {
        table: TableLayout {
            deleted: Some(FieldDef::i32(28)),
            ..table("relations", "   1/TBkndCons", 36, None)
        },
        predecessor: FieldDef::i32(12),
        successor: FieldDef::i32(16),
        kind: FieldDef::u16(20),
        lag: FieldDef::duration(24, 22),
    },
    assignments: AssignmentLayout {
        table: TableLayout {
            alternate_stride: Some(238),
            deleted: Some(FieldDef::flag(168, 0x0002)),
            ..table("assignments", "   1/TBkndAssn", 204, None)
        },
        task: FieldDef::i32(16),
        resource: FieldDef::i32(20),
        start: FieldDef::timestamp(24),
        finish: FieldDef::timestamp(28),
        work: long6(84),
        actual_work: long6(96),
        cost: long6(132),
        units: FieldDef::scaled(80, IntWidth::U16, 100.0),
    },
    tables: TableDefinitionLayout {
        table: TableLayout {
            sentinel: None,
            ..table("tables", "   2/CTable", 126, deferred(TABLE_POINTERS))
        },
        name: FieldDef::text(4, 118),
        resource_flag: ResourceFlag::FirstColumnZero,
        column_keys: &[VarKey(COLUMN_DATA)],
        columns: ColumnLayout {
            count_offset: 4,
            count_bias: 1,
            first_offset: 8,
            stride: 12,
            field: FieldDef::u16(0),
            width: FieldDef::u8(4),
            title_alignment: FieldDef::u8(8),
            data_alignment: FieldDef::u8(10),
            alignment_codes: AlignmentCodes::Character,
            title: ColumnTitle::AtOffset(FieldDef::u16(6)),
        },
    },
    views: ViewLayout {
        table: TableLayout {
            sentinel: None,
            ..table("views", "   2/CV_iew", 138, deferred(VIEW_POINTERS))
        },
        name: FieldDef::text(4, 100),
        split: FieldDef::flag(110, 0x0001),
        view_type: FieldDef::u16(112),
        properties: VarKey(VIEW_PROPERTIES),
    },
    filters: None,
    groups: None,
};
