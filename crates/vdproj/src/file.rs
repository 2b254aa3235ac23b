//! File-level conversion with extension-based dispatch.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use vdproj_common::{Error, Result};

use crate::convert::{vdproj_to_xml, xml_to_vdproj, Config};

/// One of the two supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Visual Studio installer project text.
    Vdproj,
    /// XML produced by this crate.
    Xml,
}

impl Format {
    /// Detect the format from a file extension (`.vdproj` or `.xml`, any case).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.trim();
        if extension.eq_ignore_ascii_case("vdproj") {
            Some(Self::Vdproj)
        } else if extension.eq_ignore_ascii_case("xml") {
            Some(Self::Xml)
        } else {
            None
        }
    }

    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vdproj => "vdproj",
            Self::Xml => "xml",
        }
    }

    /// The format this one converts into.
    pub const fn target(self) -> Self {
        match self {
            Self::Vdproj => Self::Xml,
            Self::Xml => Self::Vdproj,
        }
    }
}

/// Output path used when none is given: the input path with the other format's extension.
pub fn default_output_path(input: &Path) -> Result<PathBuf> {
    let format = detect(input)?;
    Ok(input.with_extension(format.target().extension()))
}

/// Convert `input` into `output`, choosing the direction from the input's extension.
///
/// The result is written to a temporary file next to `output` and moved into
/// place only once the conversion has succeeded, so a failed run never leaves
/// a truncated output behind.
///
/// Returns the format of the input.
pub fn convert_file(input: impl AsRef<Path>, output: impl AsRef<Path>, config: &Config) -> Result<Format> {
    let input = input.as_ref();
    let output = output.as_ref();
    let format = detect(input)?;

    info!(
        "Converting {} -> {}",
        input.display(),
        output.display()
    );

    let reader = BufReader::new(File::open(input)?);

    let directory = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(directory)?;
    debug!(temp = %temp.path().display(), "writing to temporary file");

    {
        let writer = BufWriter::new(temp.as_file_mut());
        match format {
            Format::Vdproj => vdproj_to_xml(reader, writer, config)?,
            Format::Xml => xml_to_vdproj(reader, writer)?,
        }
    }

    temp.persist(output).map_err(|e| Error::Io(e.error))?;
    info!("Conversion complete");

    Ok(format)
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "\"DeployProject\"\r\n{\r\n    \"VSVersion\" = \"3:800\"\r\n    \"Hierarchy\"\r\n    {\r\n    }\r\n}\r\n";

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("Setup.vdproj")), Some(Format::Vdproj));
        assert_eq!(Format::from_path(Path::new("Setup.VDPROJ")), Some(Format::Vdproj));
        assert_eq!(Format::from_path(Path::new("dir/Setup.Xml")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("Setup.txt")), None);
        assert_eq!(Format::from_path(Path::new("Setup")), None);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("a/Setup.vdproj")).unwrap(),
            PathBuf::from("a/Setup.xml")
        );
        assert_eq!(
            default_output_path(Path::new("Setup.xml")).unwrap(),
            PathBuf::from("Setup.vdproj")
        );
        assert!(matches!(
            default_output_path(Path::new("Setup.txt")),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_convert_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Setup.vdproj");
        let xml = dir.path().join("Setup.xml");
        let back = dir.path().join("Back.vdproj");
        std::fs::write(&source, PROJECT).unwrap();

        let config = Config::new().pretty_print(true);
        assert_eq!(convert_file(&source, &xml, &config).unwrap(), Format::Vdproj);
        assert_eq!(convert_file(&xml, &back, &config).unwrap(), Format::Xml);

        assert_eq!(std::fs::read_to_string(&back).unwrap(), PROJECT);
    }

    #[test]
    fn test_failed_conversion_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Broken.vdproj");
        let output = dir.path().join("Broken.xml");
        std::fs::write(&source, "\"DeployProject\"\r\n{\r\n").unwrap();

        let result = convert_file(&source, &output, &Config::new());
        assert!(matches!(result, Err(Error::UnbalancedStructure(_))));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_file(
            dir.path().join("missing.vdproj"),
            dir.path().join("missing.xml"),
            &Config::new(),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
