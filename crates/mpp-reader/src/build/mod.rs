//! Entity builders: decoded records into model entities.
//!
//! Builders run in a fixed order: calendars, resources, tasks, relations,
//! assignments, then the presentation data (tables, views, filters, groups). Each one walks its table through
//! [`BuildContext::for_each_record`], which owns the per-record policy:
//! sentinel keys and records marked deleted are skipped, duplicate
//! identifiers are reported, and a truncated optional table keeps the
//! records decoded so far.

mod assignment;
mod calendar;
mod presentation;
mod relation;
mod resource;
mod task;

pub(crate) use assignment::build_assignments;
pub(crate) use calendar::build_calendars;
pub(crate) use presentation::{build_filters, build_groups, build_tables, build_views};
pub(crate) use relation::build_relations;
pub(crate) use resource::build_resources;
pub(crate) use task::build_tasks;

use mpp_cfb::CompoundFile;
use mpp_model::{Diagnostic, DiagnosticReason, EntityKind, ModelError, ProjectBuilder};
use tracing::debug;

use crate::decode::{Obfuscation, RawRecord, TableDecoder};
use crate::error::{ReadError, Result};
use crate::layout::{FieldDef, FormatLayout, TableLayout, VarKey};

/// Shared state of one read.
pub(crate) struct BuildContext<'a> {
    pub file: &'a CompoundFile,
    pub layout: &'static FormatLayout,
    pub obfuscation: Obfuscation,
    pub builder: ProjectBuilder,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        file: &'a CompoundFile,
        layout: &'static FormatLayout,
        obfuscation: Obfuscation,
        builder: ProjectBuilder,
    ) -> Self {
        Self {
            file,
            layout,
            obfuscation,
            builder,
        }
    }

    /// Decode `table` and hand every live record to `build` with its uid.
    ///
    /// Returns the number of entities `build` accepted.
    pub fn for_each_record<F>(
        &mut self,
        table: &'static TableLayout,
        kind: EntityKind,
        mut build: F,
    ) -> Result<usize>
    where
        F: FnMut(&mut ProjectBuilder, i32, &RawRecord<'_>) -> mpp_model::Result<()>,
    {
        let Some(decoder) =
            TableDecoder::open(self.file, table, &self.layout.dates, self.obfuscation)?
        else {
            return Ok(0);
        };

        for entry in decoder.malformed() {
            self.builder.record(Diagnostic::entity(
                kind,
                entry.id,
                DiagnosticReason::MalformedBlob { key: entry.key.0 },
            ));
        }

        let mut built = 0;
        for record in decoder.records() {
            let record = match record {
                Ok(record) => record,
                Err(ReadError::TruncatedRecord { index, .. }) if !table.required => {
                    self.builder.record(Diagnostic::new(
                        kind,
                        None,
                        DiagnosticReason::TruncatedTable { index },
                    ));
                    break;
                }
                Err(err) => return Err(err),
            };

            let key = record.key();
            let deleted = table.deleted.is_some_and(|field| record.flag(&field));
            if table.sentinel == Some(key) || deleted {
                self.builder.record(Diagnostic::entity(
                    kind,
                    key,
                    DiagnosticReason::SkippedSentinel,
                ));
                continue;
            }
            let Ok(uid) = i32::try_from(key) else {
                self.builder.record(Diagnostic::entity(
                    kind,
                    key,
                    DiagnosticReason::InvalidValue {
                        field: "uid",
                        value: key,
                    },
                ));
                continue;
            };

            match build(&mut self.builder, uid, &record) {
                Ok(()) => built += 1,
                Err(ModelError::DuplicateIdentifier { id, .. }) => {
                    self.builder.record(Diagnostic::entity(
                        kind,
                        id,
                        DiagnosticReason::DuplicateIdentifier,
                    ));
                }
            }
        }

        debug!(
            table = table.label,
            records = decoder.len(),
            built,
            "built entities"
        );
        Ok(built)
    }
}

/// Mandatory reference: the raw `i32`, kept even when it cannot resolve so
/// the resolution pass can report it. Unreadable values become `-1`.
fn raw_reference(record: &RawRecord<'_>, field: &FieldDef) -> i32 {
    record
        .int(field)
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(-1)
}

/// Owned text of a variable blob.
fn var_string(record: &RawRecord<'_>, key: VarKey) -> Option<String> {
    record.var_text(key).map(|text| text.to_string())
}
