use std::fmt;

use thiserror::Error;

use crate::mime;

/// A file as reported by the host before normalization.
///
/// This mirrors what browsers hand out (`File`) and what the native backends
/// can cheaply learn about a path: a name, an optional size and whatever type
/// the platform guessed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawFile {
    /// Base file name.
    pub name: String,
    /// Size in bytes, when known.
    pub size: Option<u64>,
    /// Reported MIME type (browsers may leave this empty).
    pub mime_type: String,
    /// Relative path reported by the platform (e.g. `webkitRelativePath`).
    pub relative_path: Option<String>,
}

impl RawFile {
    /// Create a raw file with a name and size.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            mime_type: String::new(),
            relative_path: None,
        }
    }

    /// Set the reported MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Set the platform-reported relative path.
    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }
}

/// One candidate file flowing through extraction and validation.
///
/// Descriptors are immutable: the MIME type is inferred and the relative path
/// derived once, at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileDescriptor {
    name: String,
    size: Option<u64>,
    mime_type: String,
    relative_path: String,
}

impl FileDescriptor {
    /// Normalize a raw file, keeping its own relative path (or its name).
    pub fn from_raw(raw: RawFile) -> Self {
        Self::build(raw, None)
    }

    /// Normalize a raw file found at `path` (e.g. a directory entry's full path).
    pub fn with_path(raw: RawFile, path: impl Into<String>) -> Self {
        Self::build(raw, Some(path.into()))
    }

    /// Descriptor for a dragged item whose bytes are not readable yet.
    ///
    /// During `dragenter`/`dragover` only the item type is known.
    pub fn probe(mime_type: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            size: None,
            mime_type: mime_type.into(),
            relative_path: String::new(),
        }
    }

    fn build(raw: RawFile, path: Option<String>) -> Self {
        let RawFile {
            name,
            size,
            mime_type,
            relative_path,
        } = raw;
        let mime_type = if mime_type.is_empty() {
            mime::from_file_name(&name).unwrap_or_default().to_string()
        } else {
            mime_type
        };
        let relative_path = path
            .or(relative_path.filter(|p| !p.is_empty()))
            .unwrap_or_else(|| name.clone());
        Self {
            name,
            size,
            mime_type,
            relative_path,
        }
    }

    /// Base file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes, `None` when unknown.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Reported or inferred MIME type; may be empty.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Path relative to the drop root, or the name when no richer path exists.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }
}

impl From<RawFile> for FileDescriptor {
    fn from(raw: RawFile) -> Self {
        Self::from_raw(raw)
    }
}

/// Machine-readable reason attached to a [`FileError`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// The file does not match any accepted type.
    InvalidType,
    /// The file exceeds the maximum size.
    TooLarge,
    /// The file is below the minimum size.
    TooSmall,
    /// The batch exceeds the allowed number of files.
    TooManyFiles,
    /// Code produced by a custom validator.
    Custom(String),
}

impl ErrorCode {
    /// Wire name of the code (`file-invalid-type`, `too-many-files`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::InvalidType => "file-invalid-type",
            ErrorCode::TooLarge => "file-too-large",
            ErrorCode::TooSmall => "file-too-small",
            ErrorCode::TooManyFiles => "too-many-files",
            ErrorCode::Custom(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation failure for one file. Never raised, only reported.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileError {
    /// Failure code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl FileError {
    /// Create an error with an arbitrary code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error produced by a custom validator.
    pub fn custom(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Custom(code.into()), message)
    }

    pub(crate) fn invalid_type(accepted: &[String]) -> Self {
        let expected = if accepted.len() > 1 {
            format!("one of {}", accepted.join(", "))
        } else {
            accepted.first().cloned().unwrap_or_default()
        };
        Self::new(
            ErrorCode::InvalidType,
            format!("File type must be {expected}"),
        )
    }

    pub(crate) fn too_large(max_size: u64) -> Self {
        Self::new(
            ErrorCode::TooLarge,
            format!("File is larger than {max_size} {}", byte_unit(max_size)),
        )
    }

    pub(crate) fn too_small(min_size: u64) -> Self {
        Self::new(
            ErrorCode::TooSmall,
            format!("File is smaller than {min_size} {}", byte_unit(min_size)),
        )
    }

    pub(crate) fn too_many_files() -> Self {
        Self::new(ErrorCode::TooManyFiles, "Too many files")
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

fn byte_unit(n: u64) -> &'static str {
    if n == 1 { "byte" } else { "bytes" }
}

/// A rejected file together with every reason it was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileRejection {
    /// The rejected file.
    pub file: FileDescriptor,
    /// Non-empty, ordered list of failures.
    pub errors: Vec<FileError>,
}

/// Errors surfaced to the error observer.
///
/// Validation failures are not errors; they end up in [`FileRejection`]s.
#[derive(Error, Debug)]
pub enum DropzoneError {
    /// User dismissed the file picker.
    #[error("cancelled")]
    Cancelled,
    /// The picker refused to open (insecure context, missing permission, ...).
    #[error("security error: {0}")]
    Security(String),
    /// A transfer item did not resolve to a file.
    #[error("{0} is not a file")]
    NotAFile(String),
    /// Reading a file or directory entry failed.
    #[error("read failed: {0}")]
    Read(String),
    /// The modern picker is unusable and no hidden input was provided.
    #[error(
        "cannot open the file picker: the file system access API is not supported and no input element was provided"
    )]
    NoInputElement,
    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Platform-specific error or general failure
    #[error("internal error: {0}")]
    Internal(String),
}
