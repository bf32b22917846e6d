use mpp_model::{CalendarId, EntityKind, Resource, ResourceId, ResourceKind};

use super::{BuildContext, var_string};
use crate::error::Result;

pub(crate) fn build_resources(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.resources;
    ctx.for_each_record(&layout.table, EntityKind::Resource, |builder, uid, record| {
        let mut resource = Resource::new(ResourceId::new(uid));
        resource.id = record.reference(&layout.id);
        resource.name = var_string(record, layout.name);
        resource.initials = var_string(record, layout.initials);
        resource.group = var_string(record, layout.group);
        resource.email = var_string(record, layout.email);
        resource.kind = if layout.material.is_some_and(|field| record.flag(&field)) {
            ResourceKind::Material
        } else {
            ResourceKind::Work
        };
        resource.calendar = record.reference(&layout.calendar).map(CalendarId::new);
        resource.standard_rate = record.float(&layout.standard_rate);
        resource.overtime_rate = record.float(&layout.overtime_rate);
        resource.cost = record.float(&layout.cost);
        resource.max_units = record.float(&layout.max_units);

        for field in layout.custom {
            if let Some(text) = var_string(record, field.key) {
                resource.custom_text.insert(field.name.to_string(), text);
            }
        }
        builder.add_resource(resource)
    })
}
