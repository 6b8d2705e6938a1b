//! File locators recorded on decoded volumes.

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An absolute file path and its `file:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceRef {
    path: PathBuf,
    uri: String,
}

impl SourceRef {
    /// Resolves `path` against the working directory and builds its URI.
    ///
    /// No file system access beyond reading the working directory.
    ///
    /// # Errors
    /// Returns [`Error::MalformedSourceReference`] if the path is empty,
    /// contains a NUL byte, or is not valid UTF-8.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = path.to_str().ok_or_else(|| {
            Error::MalformedSourceReference(format!("{} is not valid UTF-8", path.display()))
        })?;
        if text.is_empty() {
            return Err(Error::MalformedSourceReference("empty path".into()));
        }
        if text.contains('\0') {
            return Err(Error::MalformedSourceReference(format!(
                "{text:?} contains a NUL byte"
            )));
        }

        let absolute = std::path::absolute(path)
            .map_err(|e| Error::MalformedSourceReference(format!("{text}: {e}")))?;
        let uri = file_uri(&absolute)?;

        Ok(Self {
            path: absolute,
            uri,
        })
    }

    /// Absolute path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `file:` URI for the path.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

fn file_uri(absolute: &Path) -> Result<String> {
    let text = absolute.to_str().ok_or_else(|| {
        Error::MalformedSourceReference(format!("{} is not valid UTF-8", absolute.display()))
    })?;

    let mut normalized = if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.to_string()
    };
    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }

    let mut uri = String::with_capacity(normalized.len() + 5);
    uri.push_str("file:");
    for byte in normalized.bytes() {
        if is_path_safe(byte) {
            uri.push(char::from(byte));
        } else {
            uri.push_str(&format!("%{byte:02X}"));
        }
    }
    Ok(uri)
}

/// Unreserved and sub-delim bytes allowed unescaped in a URI path.
fn is_path_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b'/'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'@'
        )
}
