//! Reading several project files and shaping them for display.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, anyhow};
use mpp_model::{Project, TaskId};
use mpp_reader::{MppReader, ReaderOptions};
use serde::Serialize;
use tracing::{debug, info_span};

/// Outcome of reading one file.
#[derive(Debug)]
pub struct FileRead {
    pub path: PathBuf,
    pub result: Result<Project>,
}

impl FileRead {
    /// The read succeeded but recorded diagnostics.
    pub fn has_diagnostics(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|project| !project.diagnostics().is_empty())
    }
}

/// Decode every file on its own thread. Results keep the input order.
pub fn read_files(paths: &[PathBuf], options: &ReaderOptions) -> Vec<FileRead> {
    let reader = MppReader::with_options(options.clone());
    thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| {
                let reader = &reader;
                scope.spawn(move || read_one(reader, path))
            })
            .collect();
        handles
            .into_iter()
            .zip(paths)
            .map(|(handle, path)| FileRead {
                path: path.clone(),
                result: handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("reader thread panicked"))),
            })
            .collect()
    })
}

fn read_one(reader: &MppReader, path: &Path) -> Result<Project> {
    let _span = info_span!("file", path = %path.display()).entered();
    let project = reader
        .open(path)
        .with_context(|| format!("read {}", path.display()))?;
    debug!(tasks = project.task_count(), "decoded");
    Ok(project)
}

/// Process exit status for a batch: 1 when any read failed, 2 in strict
/// mode when a read recorded diagnostics, otherwise 0.
pub fn exit_code(reads: &[FileRead], strict: bool) -> i32 {
    if reads.iter().any(|read| read.result.is_err()) {
        1
    } else if strict && reads.iter().any(FileRead::has_diagnostics) {
        2
    } else {
        0
    }
}

/// One line of a task listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub outline: String,
    pub uid: i32,
    pub id: Option<i32>,
    pub name: String,
    pub depth: usize,
    pub start: Option<String>,
    pub finish: Option<String>,
    pub duration: Option<String>,
}

/// Tasks in outline order: each task followed by its subtree.
pub fn task_rows(project: &Project) -> Vec<TaskRow> {
    let mut rows = Vec::with_capacity(project.task_count());
    let mut stack: Vec<(TaskId, usize)> = project.root_tasks().map(|task| (task.uid, 0)).collect();
    stack.reverse();
    while let Some((uid, depth)) = stack.pop() {
        let Some(task) = project.task(uid) else {
            continue;
        };
        rows.push(TaskRow {
            outline: project.outline_number(uid).unwrap_or_default().to_string(),
            uid: uid.get(),
            id: task.id,
            name: task.name.clone().unwrap_or_default(),
            depth,
            start: task.start.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            finish: task.finish.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            duration: task.duration.map(|d| d.to_string()),
        });
        let children: Vec<TaskId> = project.children(uid).map(|child| child.uid).collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    rows
}

#[derive(Serialize)]
struct JsonRead<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Machine-readable dump of a batch.
pub fn to_json(reads: &[FileRead]) -> Result<String> {
    let entries: Vec<JsonRead<'_>> = reads
        .iter()
        .map(|read| JsonRead {
            file: read.path.display().to_string(),
            project: read.result.as_ref().ok(),
            error: read.result.as_ref().err().map(|e| format!("{e:#}")),
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("serialize projects")
}
