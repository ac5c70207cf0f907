//! Answer files: a JSON object mapping question names (and `<name>-Comment` keys) to values.

use std::{fs, path::Path};

use survey_model::{Error, ValueMap};
use tracing::debug;

/// Parse answers from JSON text; `path` labels errors.
pub fn parse(source: &str, path: Option<&Path>) -> Result<ValueMap, Error> {
    serde_json::from_str(source).map_err(|err| Error::Parse {
        path: path.map(Path::to_path_buf),
        message: format!("answers must be a JSON object: {err}"),
    })
}

/// Read and parse an answer file.
pub fn load(path: &Path) -> Result<ValueMap, Error> {
    let source = fs::read_to_string(path).map_err(|err| Error::Read {
        path: Some(path.to_path_buf()),
        message: err.to_string(),
    })?;
    let answers = parse(&source, Some(path))?;
    debug!(path = %path.display(), answers = answers.len(), "answers_loaded");
    Ok(answers)
}
