//! Presentation tables, the views that display them, and saved filters and
//! groups.

use mpp_model::{
    Alignment, Column, Diagnostic, DiagnosticReason, EntityKind, FieldClass, Filter, FilterId,
    Group, GroupClause, GroupId, Table, TableId, View, ViewId, ViewType, field_name,
};

use super::BuildContext;
use crate::decode::WideStr;
use crate::decode::value::{field_int, field_text, remove_ampersands, slice};
use crate::error::Result;
use crate::layout::{
    AlignmentCodes, ClauseLayout, ColumnLayout, ColumnTitle, FieldDef, ResourceFlag,
};
use crate::props::{Props, keys};

/// Top byte of a clause field id.
const TASK_FIELD_CLASS: i64 = 0x0B;
const RESOURCE_FIELD_CLASS: i64 = 0x0C;

pub(crate) fn build_tables(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.tables;
    ctx.for_each_record(&layout.table, EntityKind::Table, |builder, uid, record| {
        let blob = layout
            .column_keys
            .iter()
            .find_map(|&key| record.var(key).map(|blob| (key, blob)));
        let resource = match layout.resource_flag {
            ResourceFlag::Field(field) => record.flag(&field),
            ResourceFlag::FirstColumnZero => blob
                .and_then(|(_, blob)| {
                    let columns = &layout.columns;
                    slice(blob, columns.first_offset, columns.stride)
                })
                .is_some_and(|first| code(first, &layout.columns.field) == 0),
        };
        let class = if resource {
            FieldClass::Resource
        } else {
            FieldClass::Task
        };
        let mut table = Table::new(TableId::new(uid), class);
        table.name = record
            .text(&layout.name)
            .map(|name| remove_ampersands(&name.to_string()));

        if let Some((key, blob)) = blob {
            let (columns, complete) = decode_columns(blob, &layout.columns, class);
            table.columns = columns;
            if !complete {
                builder.record(Diagnostic::entity(
                    EntityKind::Table,
                    i64::from(uid),
                    DiagnosticReason::MalformedBlob { key: key.0 },
                ));
            }
        }
        builder.add_table(table)
    })
}

fn code(data: &[u8], field: &FieldDef) -> u16 {
    field_int(data, field)
        .and_then(|v| u16::try_from(v).ok())
        .unwrap_or(0)
}

fn alignment(codes: AlignmentCodes, code: u16) -> Alignment {
    match codes {
        AlignmentCodes::Nibble => Alignment::from_code(code & 0x0F),
        AlignmentCodes::Character => match code {
            32 => Alignment::Left,
            33 => Alignment::Center,
            _ => Alignment::Right,
        },
    }
}

/// Stored title of the column at `data`, which starts inside `blob`.
fn column_title(blob: &[u8], data: &[u8], title: ColumnTitle) -> Option<String> {
    match title {
        ColumnTitle::Inline(field) => field_text(data, &field).map(|title| title.to_string()),
        ColumnTitle::AtOffset(field) => {
            let offset = usize::from(code(data, &field));
            let text = WideStr::new(blob.get(offset..).filter(|_| offset != 0)?);
            (!text.is_empty()).then(|| text.to_string())
        }
    }
}

/// Columns in stored order, and whether the blob held every declared column.
fn decode_columns(blob: &[u8], layout: &ColumnLayout, class: FieldClass) -> (Vec<Column>, bool) {
    let Some(stored) = field_int(blob, &FieldDef::u16(layout.count_offset)) else {
        return (Vec::new(), false);
    };
    let count = usize::try_from(stored).unwrap_or(0) + layout.count_bias;
    let mut columns = Vec::with_capacity(count);
    for i in 0..count {
        let Some(data) = slice(blob, layout.first_offset + i * layout.stride, layout.stride) else {
            return (columns, false);
        };
        let field = code(data, &layout.field);
        let codes = layout.alignment_codes;
        columns.push(Column {
            field,
            field_name: field_name(class, field).map(str::to_string),
            title: column_title(blob, data, layout.title),
            width: code(data, &layout.width),
            title_alignment: alignment(codes, code(data, &layout.title_alignment)),
            data_alignment: alignment(codes, code(data, &layout.data_alignment)),
        });
    }
    (columns, true)
}

/// Views resolve their table by name, so tables must be built first.
pub(crate) fn build_views(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.views;
    let blob_layout = &format.project_properties;
    ctx.for_each_record(&layout.table, EntityKind::View, |builder, uid, record| {
        let view_type = ViewType::from_code(code(record.bytes(), &layout.view_type));
        let mut view = View::new(ViewId::new(uid), view_type);
        view.name = record
            .text(&layout.name)
            .map(|name| remove_ampersands(&name.to_string()));
        view.split = record.flag(&layout.split);

        let table_name = record
            .var(layout.properties)
            .map(|blob| Props::parse(blob, blob_layout.header_len, blob_layout.count_offset))
            .and_then(|props| props.text(keys::VIEW_TABLE_NAME))
            .map(|name| remove_ampersands(&name))
            .filter(|name| !name.is_empty());
        if let Some(name) = table_name {
            view.table = builder.table_id_by_name(&name);
            if view.table.is_none() {
                builder.record(Diagnostic::entity(
                    EntityKind::View,
                    i64::from(uid),
                    DiagnosticReason::UnresolvedName {
                        field: "table",
                        name,
                    },
                ));
            }
        }
        builder.add_view(view)
    })
}

pub(crate) fn build_filters(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let Some(layout) = &format.filters else {
        return Ok(0);
    };
    ctx.for_each_record(&layout.table, EntityKind::Filter, |builder, uid, record| {
        let Some(definition) = record.var(layout.definition) else {
            return Ok(());
        };
        let mut filter = Filter::new(FilterId::new(uid));
        filter.name = record
            .text(&layout.name)
            .map(|name| remove_ampersands(&name.to_string()));
        filter.show_related_summary_rows =
            field_int(definition, &layout.show_related_summary_rows).is_some_and(|v| v != 0);
        builder.add_filter(filter)
    })
}

pub(crate) fn build_groups(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let Some(layout) = &format.groups else {
        return Ok(0);
    };
    ctx.for_each_record(&layout.table, EntityKind::Group, |builder, uid, record| {
        let Some(definition) = record.var(layout.definition) else {
            return Ok(());
        };
        let mut group = Group::new(GroupId::new(uid));
        group.name = record
            .text(&layout.name)
            .map(|name| remove_ampersands(&name.to_string()));
        group.show_summary_tasks =
            field_int(definition, &layout.show_summary_tasks).is_some_and(|v| v != 0);
        for clause in decode_clauses(definition, &layout.clauses) {
            match clause {
                Ok(clause) => group.clauses.push(clause),
                Err(field) => builder.record(Diagnostic::entity(
                    EntityKind::Group,
                    i64::from(uid),
                    DiagnosticReason::InvalidValue {
                        field: "group_field",
                        value: field,
                    },
                )),
            }
        }
        builder.add_group(group)
    })
}

/// A decoded clause, or the raw field id when it names neither tasks nor
/// resources.
type ClauseResult = std::result::Result<GroupClause, i64>;

/// Clauses that fit the blob, in stored order.
fn decode_clauses(blob: &[u8], layout: &ClauseLayout) -> Vec<ClauseResult> {
    let count = field_int(blob, &layout.count).unwrap_or(0);
    let count = usize::try_from(count).unwrap_or(0);
    (0..count)
        .map_while(|i| {
            let offset = layout.first_offset + i * layout.stride;
            slice(blob, offset, layout.min_len)
        })
        .map(|data| {
            let id = field_int(data, &layout.field).unwrap_or(0);
            let class = match (id >> 24) & 0xFF {
                TASK_FIELD_CLASS => FieldClass::Task,
                RESOURCE_FIELD_CLASS => FieldClass::Resource,
                _ => return Err(id),
            };
            let field = (id & 0xFFFF) as u16;
            Ok(GroupClause {
                class,
                field,
                field_name: field_name(class, field).map(str::to_string),
                ascending: field_int(data, &layout.ascending).is_some_and(|v| v != 0),
                group_on: code(data, &layout.group_on),
            })
        })
        .collect()
}
