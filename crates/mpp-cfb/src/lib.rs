//! Compound File Binary container access.
//!
//! Project files are stored inside a generic compound document: a small
//! FAT-style file system of storages (directories) and streams packed into
//! fixed-size sectors. This crate reassembles every stream in the container
//! and exposes them by `/`-separated path, for example
//! `"   19/TBkndTask/FixedData"`.
//!
//! # Example
//!
//! ```
//! use mpp_cfb::{CompoundFile, CompoundFileWriter};
//!
//! let bytes = CompoundFileWriter::new()
//!     .with_stream("   19/Props", vec![1, 2, 3])
//!     .unwrap()
//!     .finish()
//!     .unwrap();
//!
//! let file = CompoundFile::parse(&bytes).unwrap();
//! assert_eq!(file.stream("   19/Props"), Some(&[1u8, 2, 3][..]));
//! assert!(file.has_storage("   19"));
//! ```

mod directory;
mod error;
mod fat;
pub mod header;
mod reader;
mod writer;

pub use directory::{DirectoryEntry, EntryType};
pub use error::{ChainFault, ContainerError, Result};
pub use reader::{CompoundFile, Stream};
pub use writer::CompoundFileWriter;
