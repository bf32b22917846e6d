use mpp_model::{Assignment, AssignmentId, EntityKind, ResourceId, TaskId};

use super::{BuildContext, raw_reference};
use crate::error::Result;

/// Endpoints are kept verbatim; assignments whose task or resource is
/// missing are dropped when the project is finished.
pub(crate) fn build_assignments(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.assignments;
    ctx.for_each_record(&layout.table, EntityKind::Assignment, |builder, uid, record| {
        let mut assignment = Assignment::new(
            AssignmentId::new(uid),
            TaskId::new(raw_reference(record, &layout.task)),
            ResourceId::new(raw_reference(record, &layout.resource)),
        );
        assignment.start = record.timestamp(&layout.start);
        assignment.finish = record.timestamp(&layout.finish);
        assignment.work = record.work(&layout.work);
        assignment.actual_work = record.work(&layout.actual_work);
        assignment.cost = record.float(&layout.cost);
        assignment.units = record.float(&layout.units);
        builder.add_assignment(assignment)
    })
}
