//! File generation detection from the `CompObj` stream.

use mpp_cfb::CompoundFile;
use tracing::debug;

use crate::decode::value::{read_u32, slice};
use crate::error::{ReadError, Result};
use crate::layout::FileGeneration;

/// Root stream naming the writing application and file format.
pub const COMP_OBJ_STREAM: &str = "\u{1}CompObj";

const COMP_OBJ_HEADER_LEN: usize = 28;

/// What the `CompObj` stream says about a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedFormat {
    pub generation: FileGeneration,
    pub application_name: Option<String>,
    /// Major version from names like `Microsoft Project 14.0`.
    pub application_version: Option<u32>,
    pub file_format: String,
    pub application_id: Option<String>,
}

/// Detect the generation of `file`.
pub fn detect(file: &CompoundFile) -> Result<DetectedFormat> {
    let data = file
        .stream(COMP_OBJ_STREAM)
        .ok_or_else(|| ReadError::missing_stream(COMP_OBJ_STREAM))?;
    let mut strings = AnsiStrings {
        data,
        offset: COMP_OBJ_HEADER_LEN,
    };
    let application_name = strings.next_string()?;
    let file_format = strings
        .next_string()?
        .ok_or_else(|| ReadError::corrupt("CompObj carries no file format"))?;
    let application_id = strings.next_string().ok().flatten();

    let tag = generation_tag(&file_format).ok_or_else(|| {
        ReadError::corrupt(format!("file format {file_format:?} has no generation tag"))
    })?;
    let generation =
        FileGeneration::from_format(&file_format).ok_or_else(|| ReadError::UnsupportedVersion {
            tag,
            format: file_format.clone(),
        })?;
    let application_version = application_name.as_deref().and_then(application_version);

    debug!(
        format = %file_format,
        %generation,
        application = application_name.as_deref().unwrap_or(""),
        "detected file format"
    );
    Ok(DetectedFormat {
        generation,
        application_name,
        application_version,
        file_format,
        application_id,
    })
}

/// Trailing integer of a format string: `MSProject.MPP9` is 9. Tags too
/// large for `u32` saturate.
#[must_use]
pub fn generation_tag(format: &str) -> Option<u32> {
    let digits = format.len() - format.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    Some(format[format.len() - digits..].parse().unwrap_or(u32::MAX))
}

/// Parse `NN` from `Microsoft Project NN.0`.
#[must_use]
pub fn application_version(name: &str) -> Option<u32> {
    let rest = name.strip_prefix("Microsoft")?.get(1..)?.strip_prefix("Project")?;
    let version = rest.get(1..)?.strip_suffix(".0")?;
    version.parse().ok()
}

/// Cursor over `u32` length-prefixed, nul-terminated ANSI strings.
struct AnsiStrings<'a> {
    data: &'a [u8],
    offset: usize,
}

impl AnsiStrings<'_> {
    fn next_string(&mut self) -> Result<Option<String>> {
        let len = read_u32(self.data, self.offset)
            .ok_or_else(|| ReadError::corrupt("CompObj ends inside a string length"))?
            as usize;
        self.offset += 4;
        if len == 0 {
            return Ok(None);
        }
        let bytes = slice(self.data, self.offset, len)
            .ok_or_else(|| ReadError::corrupt("CompObj string runs past the stream"))?;
        self.offset += len;
        let text = bytes.split(|&b| b == 0).next().unwrap_or_default();
        // Latin-1: every byte is its own code point.
        Ok(Some(text.iter().map(|&b| char::from(b)).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpp_cfb::CompoundFileWriter;

    fn comp_obj(strings: &[&str]) -> Vec<u8> {
        let mut data = vec![0u8; COMP_OBJ_HEADER_LEN];
        for s in strings {
            data.extend(((s.len() + 1) as u32).to_le_bytes());
            data.extend(s.as_bytes());
            data.push(0);
        }
        data
    }

    fn container(strings: &[&str]) -> CompoundFile {
        let bytes = CompoundFileWriter::new()
            .with_stream(COMP_OBJ_STREAM, comp_obj(strings))
            .expect("stream")
            .finish()
            .expect("container");
        CompoundFile::parse(&bytes).expect("parse")
    }

    #[test]
    fn test_generation_tag() {
        assert_eq!(generation_tag("MSProject.MPP9"), Some(9));
        assert_eq!(generation_tag("MSProject.GLOBAL14"), Some(14));
        assert_eq!(generation_tag("MSProject.MPX"), None);
        assert_eq!(generation_tag("MSProject.MPP99999999999"), Some(u32::MAX));
    }

    #[test]
    fn test_application_version() {
        assert_eq!(application_version("Microsoft Project 14.0"), Some(14));
        assert_eq!(application_version("Microsoft.Project 9.0"), Some(9));
        assert_eq!(application_version("Microsoft Project"), None);
    }

    #[test]
    fn test_detect_supported_generation() {
        let file = container(&[
            "Microsoft Project 12.0",
            "MSProject.MPP12",
            "MSProject.Project.12",
        ]);
        let detected = detect(&file).expect("detect");
        assert_eq!(detected.generation, FileGeneration::Mpp12);
        assert_eq!(detected.application_version, Some(12));
        assert_eq!(
            detected.application_id.as_deref(),
            Some("MSProject.Project.12")
        );
    }

    #[test]
    fn test_unknown_generation_carries_tag() {
        let file = container(&["Microsoft Project 11.0", "MSProject.MPP11"]);
        match detect(&file) {
            Err(ReadError::UnsupportedVersion { tag, format }) => {
                assert_eq!(tag, 11);
                assert_eq!(format, "MSProject.MPP11");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_oversized_tag_is_unsupported() {
        let file = container(&["Microsoft Project", "MSProject.MPP99999999999"]);
        assert!(matches!(
            detect(&file),
            Err(ReadError::UnsupportedVersion { tag: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_unlisted_format_with_known_tag_is_unsupported() {
        let file = container(&["Microsoft Project 9.0", "Foo.Bar9"]);
        match detect(&file) {
            Err(ReadError::UnsupportedVersion { tag, format }) => {
                assert_eq!(tag, 9);
                assert_eq!(format, "Foo.Bar9");
            }
            other => panic!("unexpected {other:?}"),
        }
        let global = container(&["Microsoft Project 9.0", "MSProject.GLOBAL9"]);
        assert_eq!(detect(&global).map(|d| d.generation).ok(), Some(FileGeneration::Mpp9));
    }

    #[test]
    fn test_missing_comp_obj() {
        let bytes = CompoundFileWriter::new()
            .with_stream("   19/Props", vec![0; 4])
            .expect("stream")
            .finish()
            .expect("container");
        let file = CompoundFile::parse(&bytes).expect("parse");
        assert!(matches!(
            detect(&file),
            Err(ReadError::MissingStream { .. })
        ));
    }
}
