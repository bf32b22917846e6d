//! Arena builder and the reference-resolution pass.

use std::collections::{BTreeMap, BTreeSet};

use crate::assignment::Assignment;
use crate::calendar::Calendar;
use crate::diagnostic::{Diagnostic, DiagnosticReason, EntityKind};
use crate::error::{ModelError, Result};
use crate::filter::Filter;
use crate::group::Group;
use crate::ids::{AssignmentId, CalendarId, RelationId, ResourceId, TableId, TaskId};
use crate::project::{Project, ProjectIndex};
use crate::properties::ProjectProperties;
use crate::relation::Relation;
use crate::resource::Resource;
use crate::table::Table;
use crate::task::Task;
use crate::view::View;

/// Collects entities keyed by on-disk identifier, then resolves references
/// and builds the derived indices in [`ProjectBuilder::finish`].
///
/// ```
/// use mpp_model::{ProjectBuilder, Task, TaskId};
///
/// let mut builder = ProjectBuilder::new();
/// builder.add_task(Task::new(TaskId::new(1)).with_id(1)).unwrap();
/// builder
///     .add_task(Task::new(TaskId::new(2)).with_id(2).with_parent(TaskId::new(1)))
///     .unwrap();
/// let project = builder.finish();
///
/// let children: Vec<_> = project.children(TaskId::new(1)).map(|t| t.uid).collect();
/// assert_eq!(children, vec![TaskId::new(2)]);
/// ```
#[derive(Debug, Default)]
pub struct ProjectBuilder {
    properties: ProjectProperties,
    calendars: BTreeMap<CalendarId, Calendar>,
    resources: BTreeMap<ResourceId, Resource>,
    tasks: BTreeMap<TaskId, Task>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    relations: BTreeMap<RelationId, Relation>,
    tables: Vec<Table>,
    views: Vec<View>,
    filters: Vec<Filter>,
    groups: Vec<Group>,
    diagnostics: Vec<Diagnostic>,
}

fn duplicate(kind: EntityKind, id: i32) -> ModelError {
    ModelError::DuplicateIdentifier {
        kind,
        id: i64::from(id),
    }
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: ProjectProperties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn properties_mut(&mut self) -> &mut ProjectProperties {
        &mut self.properties
    }

    pub fn add_calendar(&mut self, calendar: Calendar) -> Result<()> {
        if self.calendars.contains_key(&calendar.uid) {
            return Err(duplicate(EntityKind::Calendar, calendar.uid.get()));
        }
        self.calendars.insert(calendar.uid, calendar);
        Ok(())
    }

    pub fn add_resource(&mut self, resource: Resource) -> Result<()> {
        if self.resources.contains_key(&resource.uid) {
            return Err(duplicate(EntityKind::Resource, resource.uid.get()));
        }
        self.resources.insert(resource.uid, resource);
        Ok(())
    }

    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if self.tasks.contains_key(&task.uid) {
            return Err(duplicate(EntityKind::Task, task.uid.get()));
        }
        self.tasks.insert(task.uid, task);
        Ok(())
    }

    pub fn add_assignment(&mut self, assignment: Assignment) -> Result<()> {
        if self.assignments.contains_key(&assignment.uid) {
            return Err(duplicate(EntityKind::Assignment, assignment.uid.get()));
        }
        self.assignments.insert(assignment.uid, assignment);
        Ok(())
    }

    pub fn add_relation(&mut self, relation: Relation) -> Result<()> {
        if self.relations.contains_key(&relation.uid) {
            return Err(duplicate(EntityKind::Relation, relation.uid.get()));
        }
        self.relations.insert(relation.uid, relation);
        Ok(())
    }

    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.tables.iter().any(|t| t.id == table.id) {
            return Err(duplicate(EntityKind::Table, table.id.get()));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn add_view(&mut self, view: View) -> Result<()> {
        if self.views.iter().any(|v| v.id == view.id) {
            return Err(duplicate(EntityKind::View, view.id.get()));
        }
        self.views.push(view);
        Ok(())
    }

    pub fn add_filter(&mut self, filter: Filter) -> Result<()> {
        if self.filters.iter().any(|f| f.id == filter.id) {
            return Err(duplicate(EntityKind::Filter, filter.id.get()));
        }
        self.filters.push(filter);
        Ok(())
    }

    pub fn add_group(&mut self, group: Group) -> Result<()> {
        if self.groups.iter().any(|g| g.id == group.id) {
            return Err(duplicate(EntityKind::Group, group.id.get()));
        }
        self.groups.push(group);
        Ok(())
    }

    /// Task already added under `uid`.
    pub fn task_mut(&mut self, uid: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&uid)
    }

    /// Record a decode-time anomaly.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// First table (in stored order) with exactly this name.
    pub fn table_id_by_name(&self, name: &str) -> Option<TableId> {
        self.tables
            .iter()
            .find(|t| t.name.as_deref() == Some(name))
            .map(|t| t.id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Resolve references, break cycles, and build the immutable project.
    pub fn finish(mut self) -> Project {
        self.resolve_calendars();
        self.resolve_resources();
        self.resolve_tasks();
        self.resolve_relations();
        self.resolve_assignments();
        self.resolve_views();

        let index = self.build_index();
        Project {
            properties: self.properties,
            calendars: self.calendars,
            resources: self.resources,
            tasks: self.tasks,
            assignments: self.assignments,
            relations: self.relations.into_values().collect(),
            tables: self.tables,
            views: self.views,
            filters: self.filters,
            groups: self.groups,
            diagnostics: self.diagnostics,
            index,
        }
    }

    fn resolve_calendars(&mut self) {
        let known: BTreeSet<CalendarId> = self.calendars.keys().copied().collect();
        let resources: BTreeSet<ResourceId> = self.resources.keys().copied().collect();
        for calendar in self.calendars.values_mut() {
            if let Some(parent) = calendar.parent {
                if !known.contains(&parent) {
                    calendar.parent = None;
                    self.diagnostics.push(unresolved(
                        EntityKind::Calendar,
                        calendar.uid.get(),
                        "parent",
                        parent.get(),
                    ));
                }
            }
            if let Some(owner) = calendar.resource {
                if !resources.contains(&owner) {
                    calendar.resource = None;
                    self.diagnostics.push(unresolved(
                        EntityKind::Calendar,
                        calendar.uid.get(),
                        "resource",
                        owner.get(),
                    ));
                }
            }
        }

        let links: BTreeMap<CalendarId, Option<CalendarId>> = self
            .calendars
            .values()
            .map(|c| (c.uid, c.parent))
            .collect();
        for (child, parent) in cyclic_links(&links) {
            if let Some(calendar) = self.calendars.get_mut(&child) {
                calendar.parent = None;
            }
            self.diagnostics.push(Diagnostic::entity(
                EntityKind::Calendar,
                i64::from(child.get()),
                DiagnosticReason::CalendarCycle {
                    parent: i64::from(parent.get()),
                },
            ));
        }
    }

    fn resolve_resources(&mut self) {
        for resource in self.resources.values_mut() {
            if let Some(calendar) = resource.calendar {
                if !self.calendars.contains_key(&calendar) {
                    resource.calendar = None;
                    self.diagnostics.push(unresolved(
                        EntityKind::Resource,
                        resource.uid.get(),
                        "calendar",
                        calendar.get(),
                    ));
                }
            }
        }
    }

    fn resolve_tasks(&mut self) {
        let known: BTreeSet<TaskId> = self.tasks.keys().copied().collect();
        for task in self.tasks.values_mut() {
            if let Some(parent) = task.parent {
                if !known.contains(&parent) {
                    task.parent = None;
                    self.diagnostics.push(unresolved(
                        EntityKind::Task,
                        task.uid.get(),
                        "parent",
                        parent.get(),
                    ));
                }
            }
            if let Some(calendar) = task.calendar {
                if !self.calendars.contains_key(&calendar) {
                    task.calendar = None;
                    self.diagnostics.push(unresolved(
                        EntityKind::Task,
                        task.uid.get(),
                        "calendar",
                        calendar.get(),
                    ));
                }
            }
        }

        let links: BTreeMap<TaskId, Option<TaskId>> =
            self.tasks.values().map(|t| (t.uid, t.parent)).collect();
        for (child, parent) in cyclic_links(&links) {
            if let Some(task) = self.tasks.get_mut(&child) {
                task.parent = None;
            }
            self.diagnostics.push(Diagnostic::entity(
                EntityKind::Task,
                i64::from(child.get()),
                DiagnosticReason::OutlineCycle {
                    parent: i64::from(parent.get()),
                },
            ));
        }
    }

    fn resolve_relations(&mut self) {
        let tasks = &self.tasks;
        let diagnostics = &mut self.diagnostics;
        self.relations.retain(|uid, relation| {
            let missing = [
                ("predecessor", relation.predecessor),
                ("successor", relation.successor),
            ]
            .into_iter()
            .find(|(_, task)| !tasks.contains_key(task));
            match missing {
                Some((field, target)) => {
                    diagnostics.push(dropped(EntityKind::Relation, uid.get(), field, target.get()));
                    false
                }
                None => true,
            }
        });
    }

    fn resolve_assignments(&mut self) {
        let tasks = &self.tasks;
        let resources = &self.resources;
        let diagnostics = &mut self.diagnostics;
        self.assignments.retain(|uid, assignment| {
            if !tasks.contains_key(&assignment.task) {
                diagnostics.push(dropped(
                    EntityKind::Assignment,
                    uid.get(),
                    "task",
                    assignment.task.get(),
                ));
                return false;
            }
            if !resources.contains_key(&assignment.resource) {
                diagnostics.push(dropped(
                    EntityKind::Assignment,
                    uid.get(),
                    "resource",
                    assignment.resource.get(),
                ));
                return false;
            }
            true
        });
    }

    fn resolve_views(&mut self) {
        let tables: BTreeSet<TableId> = self.tables.iter().map(|t| t.id).collect();
        for view in &mut self.views {
            if let Some(table) = view.table {
                if !tables.contains(&table) {
                    view.table = None;
                    self.diagnostics.push(unresolved(
                        EntityKind::View,
                        view.id.get(),
                        "table",
                        table.get(),
                    ));
                }
            }
        }
    }

    fn build_index(&mut self) -> ProjectIndex {
        let mut index = ProjectIndex::default();

        let mut order: Vec<&Task> = self.tasks.values().collect();
        order.sort_by_key(|t| t.display_key());
        index.task_order = order.iter().map(|t| t.uid).collect();

        for task in &order {
            match task.parent {
                Some(parent) => index.children.entry(parent).or_default().push(task.uid),
                None => index.roots.push(task.uid),
            }
        }

        let mut resources: Vec<&Resource> = self.resources.values().collect();
        resources.sort_by_key(|r| r.display_key());
        index.resource_order = resources.iter().map(|r| r.uid).collect();

        let mut pending: Vec<(TaskId, String)> = index
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &uid)| (uid, (i + 1).to_string()))
            .collect();
        while let Some((uid, number)) = pending.pop() {
            if let Some(children) = index.children.get(&uid) {
                for (i, &child) in children.iter().enumerate().rev() {
                    pending.push((child, format!("{number}.{}", i + 1)));
                }
            }
            index.outline_numbers.insert(uid, number);
        }

        for (position, relation) in self.relations.values().enumerate() {
            index
                .predecessors
                .entry(relation.successor)
                .or_default()
                .push(position);
            index
                .successors
                .entry(relation.predecessor)
                .or_default()
                .push(position);
        }

        for assignment in self.assignments.values() {
            index
                .resource_assignments
                .entry(assignment.resource)
                .or_default()
                .push(assignment.uid);
        }

        for task in self.tasks.values_mut() {
            task.summary = index.children.contains_key(&task.uid);
            task.assignments.clear();
        }
        for assignment in self.assignments.values() {
            if let Some(task) = self.tasks.get_mut(&assignment.task) {
                task.assignments.insert(assignment.uid);
            }
        }

        index.tables_by_id = self
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();
        index.views_by_id = self
            .views
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect();

        index
    }
}

fn unresolved(kind: EntityKind, id: i32, field: &'static str, target: i32) -> Diagnostic {
    Diagnostic::entity(
        kind,
        i64::from(id),
        DiagnosticReason::UnresolvedReference {
            field,
            target: i64::from(target),
        },
    )
}

fn dropped(kind: EntityKind, id: i32, field: &'static str, target: i32) -> Diagnostic {
    Diagnostic::entity(
        kind,
        i64::from(id),
        DiagnosticReason::DroppedDependent {
            field,
            target: i64::from(target),
        },
    )
}

/// Find the parent links that close a cycle.
///
/// Every parent referenced must be a key of `links`. Nodes are visited in key
/// order; when a walk up the parent chain returns to a node already on the
/// current path, the last link followed is reported as `(child, parent)` and
/// treated as removed for the rest of the scan.
pub(crate) fn cyclic_links<K: Ord + Copy>(links: &BTreeMap<K, Option<K>>) -> Vec<(K, K)> {
    let mut links = links.clone();
    let mut done = BTreeSet::new();
    let mut broken = Vec::new();

    let keys: Vec<K> = links.keys().copied().collect();
    for start in keys {
        let mut path = Vec::new();
        let mut on_path = BTreeSet::new();
        let mut current = start;
        loop {
            if done.contains(&current) {
                break;
            }
            if !on_path.insert(current) {
                if let Some(&child) = path.last() {
                    broken.push((child, current));
                    links.insert(child, None);
                }
                break;
            }
            path.push(current);
            match links.get(&current).copied().flatten() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        done.extend(path);
    }
    broken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_links_reports_self_parent() {
        let links = BTreeMap::from([(1, Some(1)), (2, None)]);
        assert_eq!(cyclic_links(&links), vec![(1, 1)]);
    }

    #[test]
    fn cyclic_links_breaks_each_cycle_once() {
        // 1 -> 2 -> 3 -> 1, and 4 -> 3 hangs off the cycle.
        let links = BTreeMap::from([(1, Some(2)), (2, Some(3)), (3, Some(1)), (4, Some(3))]);
        assert_eq!(cyclic_links(&links), vec![(3, 1)]);
    }

    #[test]
    fn cyclic_links_accepts_forests() {
        let links = BTreeMap::from([(1, None), (2, Some(1)), (3, Some(2)), (4, Some(1))]);
        assert!(cyclic_links(&links).is_empty());
    }

    #[test]
    fn duplicates_keep_first_entity() {
        let mut builder = ProjectBuilder::new();
        builder
            .add_task(Task::new(TaskId::new(5)).with_name("first"))
            .expect("first insert");
        let err = builder
            .add_task(Task::new(TaskId::new(5)).with_name("second"))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateIdentifier {
                kind: EntityKind::Task,
                id: 5
            }
        );
        let project = builder.finish();
        assert_eq!(
            project.task(TaskId::new(5)).and_then(|t| t.name.as_deref()),
            Some("first")
        );
    }

    #[test]
    fn filters_and_groups_keep_stored_order() {
        use crate::group::GroupClause;
        use crate::ids::{FilterId, GroupId};
        use crate::table::FieldClass;

        let mut builder = ProjectBuilder::new();
        let mut late = Filter::new(FilterId::new(9));
        late.name = Some("Late Tasks".to_string());
        builder.add_filter(late).expect("filter");
        builder.add_filter(Filter::new(FilterId::new(2))).expect("filter");
        assert!(builder.add_filter(Filter::new(FilterId::new(9))).is_err());

        let mut group = Group::new(GroupId::new(4));
        group.name = Some("Milestones".to_string());
        group.clauses.push(GroupClause {
            class: FieldClass::Task,
            field: 38,
            field_name: None,
            ascending: false,
            group_on: 0,
        });
        builder.add_group(group).expect("group");

        let project = builder.finish();
        let ids: Vec<i32> = project.filters().iter().map(|f| f.id.get()).collect();
        assert_eq!(ids, vec![9, 2]);
        assert!(project.filter_by_name("Late Tasks").is_some());
        let group = project.group_by_name("Milestones").expect("group by name");
        assert_eq!(group.class(), Some(FieldClass::Task));
        assert!(!group.clauses[0].ascending);
    }
}
