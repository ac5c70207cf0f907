//! Load RON documents (settings, form definitions) into typed values.

use std::{ffi::OsStr, fs, path::Path};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Error;

/// Parse a RON document from `source`; `path` is only used for error reporting.
pub fn from_ron_str<T: DeserializeOwned>(source: &str, path: Option<&Path>) -> Result<T, Error> {
    ron::from_str(source).map_err(|err| Error::Parse {
        path: path.map(Path::to_path_buf),
        message: err.to_string(),
    })
}

/// Read and parse a `.ron` file at `path`.
pub fn from_ron_path<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported document format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|err| Error::Read {
        path: Some(path.to_path_buf()),
        message: err.to_string(),
    })?;
    debug!(path = %path.display(), bytes = source.len(), "document_loaded");
    from_ron_str(&source, Some(path))
}
