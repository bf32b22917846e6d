use std::collections::BTreeMap;

use serde::Serialize;

use crate::assignment::Assignment;
use crate::calendar::Calendar;
use crate::diagnostic::Diagnostic;
use crate::filter::Filter;
use crate::group::Group;
use crate::ids::{AssignmentId, CalendarId, ResourceId, TableId, TaskId, ViewId};
use crate::properties::ProjectProperties;
use crate::relation::Relation;
use crate::resource::Resource;
use crate::table::Table;
use crate::task::Task;
use crate::view::View;

/// Derived lookups, built once by the builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProjectIndex {
    pub(crate) task_order: Vec<TaskId>,
    pub(crate) resource_order: Vec<ResourceId>,
    pub(crate) roots: Vec<TaskId>,
    pub(crate) children: BTreeMap<TaskId, Vec<TaskId>>,
    pub(crate) outline_numbers: BTreeMap<TaskId, String>,
    pub(crate) resource_assignments: BTreeMap<ResourceId, Vec<AssignmentId>>,
    pub(crate) predecessors: BTreeMap<TaskId, Vec<usize>>,
    pub(crate) successors: BTreeMap<TaskId, Vec<usize>>,
    pub(crate) tables_by_id: BTreeMap<TableId, usize>,
    pub(crate) views_by_id: BTreeMap<ViewId, usize>,
}

/// A fully resolved, read-only project.
///
/// Every reference held by an entity resolves inside the same project.
/// Construct one through [`crate::ProjectBuilder`].
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub(crate) properties: ProjectProperties,
    pub(crate) calendars: BTreeMap<CalendarId, Calendar>,
    pub(crate) resources: BTreeMap<ResourceId, Resource>,
    pub(crate) tasks: BTreeMap<TaskId, Task>,
    pub(crate) assignments: BTreeMap<AssignmentId, Assignment>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) tables: Vec<Table>,
    pub(crate) views: Vec<View>,
    pub(crate) filters: Vec<Filter>,
    pub(crate) groups: Vec<Group>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    pub(crate) index: ProjectIndex,
}

impl Project {
    pub fn properties(&self) -> &ProjectProperties {
        &self.properties
    }

    /// Anomalies recorded while decoding and resolving.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn task(&self, uid: TaskId) -> Option<&Task> {
        self.tasks.get(&uid)
    }

    pub fn resource(&self, uid: ResourceId) -> Option<&Resource> {
        self.resources.get(&uid)
    }

    pub fn assignment(&self, uid: AssignmentId) -> Option<&Assignment> {
        self.assignments.get(&uid)
    }

    pub fn calendar(&self, uid: CalendarId) -> Option<&Calendar> {
        self.calendars.get(&uid)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.index.tables_by_id.get(&id).map(|&i| &self.tables[i])
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.as_deref() == Some(name))
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.index.views_by_id.get(&id).map(|&i| &self.views[i])
    }

    pub fn view_by_name(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name.as_deref() == Some(name))
    }

    /// Tasks ordered by display id, then uid.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.index
            .task_order
            .iter()
            .filter_map(|uid| self.tasks.get(uid))
    }

    /// Resources ordered by display id, then uid.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.index
            .resource_order
            .iter()
            .filter_map(|uid| self.resources.get(uid))
    }

    /// Assignments ordered by uid.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values()
    }

    /// Calendars ordered by uid.
    pub fn calendars(&self) -> impl Iterator<Item = &Calendar> {
        self.calendars.values()
    }

    /// Relations ordered by uid.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Tables in stored order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Views in stored order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Filters in stored order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Groupings in stored order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn filter_by_name(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.name.as_deref() == Some(name))
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name.as_deref() == Some(name))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Top-level tasks in sibling order.
    pub fn root_tasks(&self) -> impl Iterator<Item = &Task> {
        self.index.roots.iter().filter_map(|uid| self.tasks.get(uid))
    }

    /// Direct children of `uid` in sibling order.
    pub fn children(&self, uid: TaskId) -> impl Iterator<Item = &Task> {
        self.index
            .children
            .get(&uid)
            .into_iter()
            .flatten()
            .filter_map(|child| self.tasks.get(child))
    }

    pub fn parent(&self, uid: TaskId) -> Option<&Task> {
        self.task(uid)
            .and_then(|t| t.parent)
            .and_then(|parent| self.task(parent))
    }

    /// Hierarchical position such as `"1.2.3"`.
    pub fn outline_number(&self, uid: TaskId) -> Option<&str> {
        self.index.outline_numbers.get(&uid).map(String::as_str)
    }

    pub fn assignments_for_task(&self, uid: TaskId) -> impl Iterator<Item = &Assignment> {
        self.task(uid)
            .into_iter()
            .flat_map(|t| t.assignments.iter())
            .filter_map(|a| self.assignments.get(a))
    }

    pub fn assignments_for_resource(&self, uid: ResourceId) -> impl Iterator<Item = &Assignment> {
        self.index
            .resource_assignments
            .get(&uid)
            .into_iter()
            .flatten()
            .filter_map(|a| self.assignments.get(a))
    }

    /// Relations whose successor is `uid`.
    pub fn predecessors(&self, uid: TaskId) -> impl Iterator<Item = &Relation> {
        self.index
            .predecessors
            .get(&uid)
            .into_iter()
            .flatten()
            .map(|&i| &self.relations[i])
    }

    /// Relations whose predecessor is `uid`.
    pub fn successors(&self, uid: TaskId) -> impl Iterator<Item = &Relation> {
        self.index
            .successors
            .get(&uid)
            .into_iter()
            .flatten()
            .map(|&i| &self.relations[i])
    }

    pub fn view_table(&self, view: &View) -> Option<&Table> {
        view.table.and_then(|id| self.table(id))
    }

    /// Calendar chain from `uid` up through its base calendars.
    pub fn calendar_chain(&self, uid: CalendarId) -> impl Iterator<Item = &Calendar> {
        std::iter::successors(self.calendar(uid), |c| {
            c.parent.and_then(|parent| self.calendar(parent))
        })
    }
}
