use mpp_model::{
    CalendarId, ConstraintType, Diagnostic, DiagnosticReason, EntityKind, Task, TaskId,
};

use super::{BuildContext, var_string};
use crate::error::Result;

/// Task position used to rebuild the outline when records carry no parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutlineEntry {
    id: i32,
    uid: TaskId,
    level: u16,
}

/// Parent of each task implied by outline levels in id order: the nearest
/// earlier task with a lower level, when that level is at least one.
fn outline_parents(mut entries: Vec<OutlineEntry>) -> Vec<(TaskId, TaskId)> {
    entries.sort_by_key(|entry| entry.id);
    let mut stack: Vec<OutlineEntry> = Vec::new();
    let mut parents = Vec::new();
    for entry in entries {
        while stack.last().is_some_and(|top| top.level >= entry.level) {
            stack.pop();
        }
        if let Some(top) = stack.last()
            && top.level >= 1
        {
            parents.push((entry.uid, top.uid));
        }
        stack.push(entry);
    }
    parents
}

pub(crate) fn build_tasks(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.tasks;
    let mut outline = Vec::new();
    let built = ctx.for_each_record(&layout.table, EntityKind::Task, |builder, uid, record| {
        let mut task = Task::new(TaskId::new(uid));
        task.id = record.reference(&layout.id);
        task.name = var_string(record, layout.name);
        task.wbs = var_string(record, layout.wbs);
        task.notes = record.var_string(layout.notes);
        task.outline_level = record
            .int(&layout.outline_level)
            .and_then(|v| u16::try_from(v).ok());
        task.parent = layout
            .parent
            .and_then(|field| record.reference(&field))
            .map(TaskId::new);
        task.milestone = record.flag(&layout.milestone);

        task.start = record.timestamp(&layout.start);
        task.finish = record.timestamp(&layout.finish);
        task.actual_start = record.timestamp(&layout.actual_start);
        task.actual_finish = record.timestamp(&layout.actual_finish);
        task.duration = record.duration(&layout.duration);
        task.work = record.work(&layout.work);
        task.actual_work = record.work(&layout.actual_work);
        task.cost = record.float(&layout.cost);
        task.percent_complete = record
            .int(&layout.percent_complete)
            .and_then(|v| u16::try_from(v).ok());
        task.calendar = layout
            .calendar
            .and_then(|field| record.reference(&field))
            .map(CalendarId::new);

        if let Some(code) = record.int(&layout.constraint_type) {
            task.constraint_type = u16::try_from(code).ok().and_then(ConstraintType::from_code);
            if task.constraint_type.is_none() {
                builder.record(Diagnostic::entity(
                    EntityKind::Task,
                    i64::from(uid),
                    DiagnosticReason::InvalidValue {
                        field: "constraint_type",
                        value: code,
                    },
                ));
            }
        }
        task.constraint_date = record.timestamp(&layout.constraint_date);

        for field in layout.custom {
            if let Some(text) = var_string(record, field.key) {
                task.custom_text.insert(field.name.to_string(), text);
            }
        }
        let entry = task.id.zip(task.outline_level).map(|(id, level)| OutlineEntry {
            id,
            uid: task.uid,
            level,
        });
        builder.add_task(task)?;
        outline.extend(entry);
        Ok(())
    })?;

    if layout.parent.is_none() {
        for (child, parent) in outline_parents(outline) {
            if let Some(task) = ctx.builder.task_mut(child) {
                task.parent = Some(parent);
            }
        }
    }
    Ok(built)
}
