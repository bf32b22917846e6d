use mpp_model::{
    Diagnostic, DiagnosticReason, EntityKind, Relation, RelationId, RelationType, TaskId,
};

use super::{BuildContext, raw_reference};
use crate::error::Result;

pub(crate) fn build_relations(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.relations;
    ctx.for_each_record(&layout.table, EntityKind::Relation, |builder, uid, record| {
        let mut relation = Relation::new(
            RelationId::new(uid),
            TaskId::new(raw_reference(record, &layout.predecessor)),
            TaskId::new(raw_reference(record, &layout.successor)),
        );
        if let Some(code) = record.int(&layout.kind) {
            match u16::try_from(code).ok().and_then(RelationType::from_code) {
                Some(kind) => relation.kind = kind,
                // Unknown type codes keep the finish-to-start default.
                None => builder.record(Diagnostic::entity(
                    EntityKind::Relation,
                    i64::from(uid),
                    DiagnosticReason::InvalidValue {
                        field: "type",
                        value: code,
                    },
                )),
            }
        }
        relation.lag = record.duration(&layout.lag);
        builder.add_relation(relation)
    })
}
