//! Project file reader.
//!
//! Reading is a single synchronous pass: detect the generation, apply the
//! protection settings from the document properties, then run the entity
//! builders in order and resolve the model.

use std::path::Path;

use mpp_cfb::CompoundFile;
use mpp_model::{Project, ProjectBuilder, ProjectProperties, ProjectReader};
use tracing::{debug, info, info_span, warn};

use crate::build::{self, BuildContext};
use crate::decode::Obfuscation;
use crate::error::{ReadError, Result};
use crate::layout::FormatLayout;
use crate::options::ReaderOptions;
use crate::props::{Props, keys};
use crate::version::{self, DetectedFormat};

/// Reader for binary project files.
///
/// ```no_run
/// use std::path::Path;
/// use mpp_reader::{MppReader, ReaderOptions};
///
/// let reader = MppReader::with_options(ReaderOptions::new().without_presentation_data());
/// let project = reader.open(Path::new("plan.mpp")).unwrap();
/// for task in project.tasks() {
///     println!("{:?}", task.name);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MppReader {
    options: ReaderOptions,
}

impl MppReader {
    /// Create a reader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with options.
    pub fn with_options(options: ReaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Read the project file at `path`.
    pub fn open(&self, path: &Path) -> Result<Project> {
        let data = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReadError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ReadError::Io(e)
            }
        })?;
        debug!(path = %path.display(), bytes = data.len(), "loaded project file");
        self.read_bytes(&data)
    }

    /// Read a project file held in memory.
    pub fn read_bytes(&self, data: &[u8]) -> Result<Project> {
        let file = CompoundFile::parse(data)?;
        self.read_container(&file)
    }

    /// Read a project from an already parsed container.
    pub fn read_container(&self, file: &CompoundFile) -> Result<Project> {
        let _span = info_span!("read", streams = file.len()).entered();

        let detected = version::detect(file)?;
        let layout = detected.generation.layout();

        let document = match &layout.document_properties {
            Some(properties) => Props::read(file, properties, Obfuscation::NONE)?,
            None => None,
        };
        let obfuscation = document.as_ref().map_or(Obfuscation::NONE, |props| {
            Obfuscation::from_code(
                props.byte(keys::PASSWORD_FLAG).unwrap_or(0),
                props.byte(keys::ENCRYPTION_CODE).unwrap_or(0),
            )
        });
        if document
            .as_ref()
            .is_some_and(|props| props.is_read_protected(obfuscation))
        {
            return Err(ReadError::PasswordProtected);
        }

        let project = Props::read(file, &layout.project_properties, obfuscation)?;
        let properties = project_properties(
            &detected,
            layout,
            document.as_ref(),
            project.as_ref(),
            obfuscation,
        );

        let mut ctx = BuildContext::new(
            file,
            layout,
            obfuscation,
            ProjectBuilder::with_properties(properties),
        );
        if !self.options.read_properties_only {
            build::build_calendars(&mut ctx)?;
            build::build_resources(&mut ctx)?;
            build::build_tasks(&mut ctx)?;
            build::build_relations(&mut ctx)?;
            build::build_assignments(&mut ctx)?;
            if self.options.read_presentation_data {
                build::build_tables(&mut ctx)?;
                build::build_views(&mut ctx)?;
                build::build_filters(&mut ctx)?;
                build::build_groups(&mut ctx)?;
            }
        }

        let project = ctx.builder.finish();
        for diagnostic in project.diagnostics() {
            warn!(code = diagnostic.reason.code(), "{diagnostic}");
        }
        info!(
            generation = %detected.generation,
            tasks = project.task_count(),
            resources = project.resource_count(),
            assignments = project.assignment_count(),
            diagnostics = project.diagnostics().len(),
            "read project"
        );

        if self.options.strict
            && let Some(first) = project.diagnostics().first()
        {
            return Err(ReadError::Diagnostics {
                count: project.diagnostics().len(),
                first: first.to_string(),
            });
        }
        Ok(project)
    }
}

impl ProjectReader for MppReader {
    type Error = ReadError;

    fn read_bytes(&self, data: &[u8]) -> Result<Project> {
        MppReader::read_bytes(self, data)
    }

    fn read_path(&self, path: &Path) -> Result<Project> {
        self.open(path)
    }
}

fn project_properties(
    detected: &DetectedFormat,
    layout: &FormatLayout,
    document: Option<&Props>,
    project: Option<&Props>,
    obfuscation: Obfuscation,
) -> ProjectProperties {
    let mut properties = ProjectProperties {
        application_name: detected.application_name.clone(),
        application_version: detected.application_version,
        file_format: Some(detected.file_format.clone()),
        file_generation: Some(detected.generation.tag()),
        project_file_path: document.and_then(|props| props.text(keys::PROJECT_FILE_PATH)),
        encrypted: obfuscation.is_active(),
        ..ProjectProperties::default()
    };
    let Some(props) = project else {
        return properties;
    };

    let dates = &layout.dates;
    properties.start_date = props.timestamp(keys::PROJECT_START_DATE, dates);
    properties.finish_date = props.timestamp(keys::PROJECT_FINISH_DATE, dates);
    properties.status_date = props.timestamp(keys::STATUS_DATE, dates);
    properties.default_calendar_name = props.text(keys::DEFAULT_CALENDAR_NAME);
    properties.currency_symbol = props.text(keys::CURRENCY_SYMBOL);
    properties.minutes_per_day = props
        .int(keys::MINUTES_PER_DAY)
        .and_then(|v| u32::try_from(v).ok());
    properties.minutes_per_week = props
        .int(keys::MINUTES_PER_WEEK)
        .and_then(|v| u32::try_from(v).ok());
    if properties.project_file_path.is_none() {
        properties.project_file_path = props.text(keys::PROJECT_FILE_PATH);
    }
    properties
}

/// Read a project file from a path with default options.
pub fn read_project(path: &Path) -> Result<Project> {
    MppReader::new().open(path)
}

/// Read a project file from a path with options.
pub fn read_project_with_options(path: &Path, options: ReaderOptions) -> Result<Project> {
    MppReader::with_options(options).open(path)
}

/// Read a project file held in memory with default options.
pub fn read_project_bytes(data: &[u8]) -> Result<Project> {
    MppReader::new().read_bytes(data)
}
