//! Project model shared by readers and consumers.
//!
//! A [`Project`] is assembled through [`ProjectBuilder`]: entities are added
//! keyed by their on-disk identifiers, then [`ProjectBuilder::finish`]
//! resolves cross references, breaks outline and calendar cycles, and builds
//! the derived indices (child lists, outline numbers, assignment
//! back-references). Anything that could not be resolved is reported in
//! [`Project::diagnostics`] rather than failing the build.

pub mod assignment;
pub mod builder;
pub mod calendar;
pub mod diagnostic;
pub mod duration;
pub mod error;
pub mod filter;
pub mod group;
pub mod ids;
pub mod project;
pub mod properties;
pub mod reader;
pub mod relation;
pub mod resource;
pub mod table;
pub mod task;
pub mod view;

pub use assignment::Assignment;
pub use builder::ProjectBuilder;
pub use calendar::{Calendar, CalendarException, DayRule, WorkingPeriod};
pub use diagnostic::{Diagnostic, DiagnosticReason, EntityKind};
pub use duration::{Duration, TimeUnit};
pub use error::{ModelError, Result};
pub use filter::Filter;
pub use group::{Group, GroupClause};
pub use ids::{
    AssignmentId, CalendarId, FilterId, GroupId, RelationId, ResourceId, TableId, TaskId, ViewId,
};
pub use project::Project;
pub use properties::ProjectProperties;
pub use reader::ProjectReader;
pub use relation::{Relation, RelationType};
pub use resource::{Resource, ResourceKind};
pub use table::{Alignment, Column, FieldClass, Table, field_name};
pub use task::{ConstraintType, Task};
pub use view::{View, ViewType};
