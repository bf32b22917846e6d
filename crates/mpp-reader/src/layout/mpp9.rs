//! Project 2000-2003 files (`MSProject.MPP9`).

use super::{
    AlignmentCodes, AssignmentLayout, COMPACT_INDEX, CalendarLayout, ClauseLayout, ColumnLayout,
    ColumnTitle, CustomField, DateEncoding, FieldDef, FileGeneration, FilterLayout, FormatLayout,
    GroupLayout, PropertyLayout, RelationLayout, ResourceFlag, ResourceLayout, STANDARD_WEEK,
    TableDefinitionLayout, TableLayout, TaskLayout, VarKey, VarSource, VarText, ViewLayout,
};

const INDEXED: VarSource = VarSource::Indexed {
    index: "VarMeta",
    data: "Var2Data",
    layout: COMPACT_INDEX,
};

const TASK_TEXT: &[CustomField] = &[
    CustomField {
        name: "Text1",
        key: VarKey(30),
    },
    CustomField {
        name: "Text2",
        key: VarKey(31),
    },
    CustomField {
        name: "Text3",
        key: VarKey(32),
    },
];

const RESOURCE_TEXT: &[CustomField] = &[
    CustomField {
        name: "Text1",
        key: VarKey(10),
    },
    CustomField {
        name: "Text2",
        key: VarKey(11),
    },
    CustomField {
        name: "Text3",
        key: VarKey(12),
    },
];

pub(super) static LAYOUT: FormatLayout = FormatLayout {
    generation: FileGeneration::Mpp9,
    dates: DateEncoding {
        epoch: (1983, 12, 31),
        ticks_per_minute: 10,
    },
    document_properties: Some(PropertyLayout {
        stream: "Props9",
        header_len: 16,
        count_offset: 12,
        obfuscated: false,
    }),
    project_properties: PropertyLayout {
        stream: "   19/Props",
        header_len: 16,
        count_offset: 12,
        obfuscated: true,
    },
    calendars: CalendarLayout {
        table: TableLayout {
            label: "calendars",
            directory: "   19/TBkndCal",
            fixed_data: "FixedData",
            fixed_meta: Some("FixedMeta"),
            var: Some(INDEXED),
            stride: 16,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: Some(-1),
            deleted: None,
            required: false,
            obfuscated: false,
        },
        parent: FieldDef::i32(4),
        resource: Some(FieldDef::i32(8)),
        name: VarKey(1),
        hours: VarKey(8),
        week: STANDARD_WEEK,
    },
    resources: ResourceLayout {
        table: TableLayout {
            label: "resources",
            directory: "   19/TBkndRsc",
            fixed_data: "FixedData",
            fixed_meta: Some("FixedMeta"),
            var: Some(INDEXED),
            stride: 64,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: Some(-1),
            deleted: None,
            required: false,
            obfuscated: true,
        },
        id: FieldDef::i32(4),
        calendar: FieldDef::i32(8),
        standard_rate: FieldDef::f64(12, 100.0),
        overtime_rate: FieldDef::f64(20, 100.0),
        cost: FieldDef::f64(28, 100.0),
        max_units: FieldDef::f64(36, 100.0),
        material: Some(FieldDef::flag(44, 0x0001)),
        name: VarKey(1),
        initials: VarKey(3),
        group: VarKey(4),
        email: VarKey(5),
        custom: RESOURCE_TEXT,
    },
    tasks: TaskLayout {
        table: TableLayout {
            label: "tasks",
            directory: "   19/TBkndTask",
            fixed_data: "FixedData",
            fixed_meta: Some("FixedMeta"),
            var: Some(INDEXED),
            stride: 96,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: Some(-1),
            deleted: None,
            required: true,
            obfuscated: true,
        },
        id: FieldDef::i32(4),
        parent: Some(FieldDef::i32(8)),
        outline_level: FieldDef::u16(12),
        milestone: FieldDef::flag(14, 0x0002),
        start: FieldDef::timestamp(16),
        finish: FieldDef::timestamp(20),
        actual_start: FieldDef::timestamp(24),
        actual_finish: FieldDef::timestamp(28),
        duration: FieldDef::duration(32, 36),
        percent_complete: FieldDef::u16(38),
        work: FieldDef::work(40),
        actual_work: FieldDef::work(48),
        cost: FieldDef::f64(56, 100.0),
        calendar: Some(FieldDef::i32(64)),
        constraint_type: FieldDef::u16(68),
        constraint_date: FieldDef::timestamp(70),
        name: VarKey(14),
        notes: VarText::wide(15),
        wbs: VarKey(16),
        custom: TASK_TEXT,
    },
    relations: RelationLayout {
        table: TableLayout {
            label: "relations",
            directory: "   19/TBkndCons",
            fixed_data: "FixedData",
            fixed_meta: None,
            var: None,
            stride: 24,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: Some(-1),
            deleted: None,
            required: false,
            obfuscated: false,
        },
        predecessor: FieldDef::i32(4),
        successor: FieldDef::i32(8),
        kind: FieldDef::u16(12),
        lag: FieldDef::duration(14, 18),
    },
    assignments: AssignmentLayout {
        table: TableLayout {
            label: "assignments",
            directory: "   19/TBkndAssn",
            fixed_data: "FixedData",
            fixed_meta: Some("FixedMeta"),
            var: None,
            stride: 64,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: Some(-1),
            deleted: None,
            required: false,
            obfuscated: false,
        },
        task: FieldDef::i32(4),
        resource: FieldDef::i32(8),
        start: FieldDef::timestamp(12),
        finish: FieldDef::timestamp(16),
        work: FieldDef::work(20),
        actual_work: FieldDef::work(28),
        cost: FieldDef::f64(36, 100.0),
        units: FieldDef::f64(44, 100.0),
    },
    tables: TableDefinitionLayout {
        table: TableLayout {
            label: "tables",
            directory: "   29/CTable",
            fixed_data: "FixedData",
            fixed_meta: None,
            var: Some(INDEXED),
            stride: 115,
            alternate_stride: Some(110),
            key: FieldDef::i32(0),
            sentinel: None,
            deleted: None,
            required: false,
            obfuscated: false,
        },
        name: FieldDef::text(4, 100),
        resource_flag: ResourceFlag::Field(FieldDef::flag(108, 0x0001)),
        column_keys: &[VarKey(2), VarKey(1)],
        columns: ColumnLayout {
            count_offset: 4,
            count_bias: 1,
            first_offset: 12,
            stride: 48,
            field: FieldDef::u16(0),
            width: FieldDef::u8(4),
            title_alignment: FieldDef::u8(5),
            data_alignment: FieldDef::u8(7),
            alignment_codes: AlignmentCodes::Nibble,
            title: ColumnTitle::Inline(FieldDef::text(16, 32)),
        },
    },
    views: ViewLayout {
        table: TableLayout {
            label: "views",
            directory: "   29/CV_iew",
            fixed_data: "FixedData",
            fixed_meta: Some("FixedMeta"),
            var: Some(INDEXED),
            stride: 122,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: None,
            deleted: None,
            required: false,
            obfuscated: false,
        },
        name: FieldDef::text(4, 100),
        split: FieldDef::flag(110, 0x0001),
        view_type: FieldDef::u16(112),
        properties: VarKey(1),
    },
    filters: Some(FilterLayout {
        table: TableLayout {
            label: "filters",
            directory: "   29/CFilter",
            fixed_data: "FixedData",
            fixed_meta: None,
            var: Some(INDEXED),
            stride: 115,
            alternate_stride: Some(110),
            key: FieldDef::i32(0),
            sentinel: None,
            deleted: None,
            required: false,
            obfuscated: false,
        },
        name: FieldDef::text(4, 100),
        definition: VarKey(1),
        show_related_summary_rows: FieldDef::u8(4),
    }),
    groups: Some(GroupLayout {
        table: TableLayout {
            label: "groups",
            directory: "   29/CGrouping",
            fixed_data: "FixedData",
            fixed_meta: None,
            var: Some(INDEXED),
            stride: 110,
            alternate_stride: None,
            key: FieldDef::i32(0),
            sentinel: None,
            deleted: None,
            required: false,
            obfuscated: false,
        },
        name: FieldDef::text(4, 100),
        definition: VarKey(6),
        show_summary_tasks: FieldDef::u16(4),
        clauses: ClauseLayout {
            count: FieldDef::u16(6),
            first_offset: 8,
            stride: 48,
            min_len: 47,
            field: FieldDef::i32(0),
            ascending: FieldDef::u8(4),
            group_on: FieldDef::u16(14),
        },
    }),
};
