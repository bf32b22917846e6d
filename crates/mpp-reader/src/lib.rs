//! Reader for binary project files.
//!
//! Project files are compound documents holding record tables whose layout
//! changes between format generations. This crate detects the generation
//! from the `CompObj` stream, decodes each table through the static layout
//! descriptors of that generation, and assembles a resolved
//! [`mpp_model::Project`].
//!
//! # Supported generations
//!
//! | Generation | Writers                  | Variable data       |
//! |------------|--------------------------|---------------------|
//! | MPP8       | Project 98               | pointers in records |
//! | MPP9       | Project 2000-2003        | side index          |
//! | MPP12      | Project 2007             | side index          |
//! | MPP14      | Project 2010 and later   | side index          |
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mpp_reader::read_project;
//!
//! let project = read_project(Path::new("plan.mpp")).unwrap();
//! for task in project.root_tasks() {
//!     println!("{} {:?}", project.outline_number(task.uid).unwrap_or(""), task.name);
//! }
//! for diagnostic in project.diagnostics() {
//!     eprintln!("{diagnostic}");
//! }
//! ```

mod build;
pub mod decode;
mod error;
pub mod layout;
mod options;
pub mod props;
mod reader;
pub mod version;

pub use error::{ReadError, Result};
pub use layout::{FileGeneration, SUPPORTED_FORMATS};
pub use options::ReaderOptions;
pub use reader::{MppReader, read_project, read_project_bytes, read_project_with_options};
pub use version::{DetectedFormat, detect};
