use burrow_core::{Error, Result, SchemaDefinition};

use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Marker prefixing a pattern that excludes previously matched files.
const EXCLUDE_PREFIX: char = '!';

/// Expands schema patterns against `root` into a deterministic, deduplicated
/// file list.
///
/// Exclusions apply after all inclusions, regardless of where they appear in
/// the pattern list. The final list is sorted lexicographically so resolution
/// does not depend on filesystem iteration order. Zero patterns or zero
/// matches yield an empty list, not an error.
pub(crate) fn resolve_patterns(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut matched: IndexSet<PathBuf> = IndexSet::new();

    for pattern in patterns.iter().filter(|p| !p.starts_with(EXCLUDE_PREFIX)) {
        for entry in expand(root, pattern)? {
            let path = entry.map_err(|err| {
                let path = err.path().display().to_string();
                Error::from(err.into_error()).context(Error::schema_resolution(path))
            })?;

            if path.is_file() {
                matched.insert(path);
            }
        }
    }

    for pattern in patterns.iter().filter(|p| p.starts_with(EXCLUDE_PREFIX)) {
        let matcher = compile_pattern(root, pattern, &pattern[1..])?;
        matched.retain(|path| !matcher.matches_path(path));
    }

    let mut files: Vec<_> = matched.into_iter().collect();
    files.sort();
    Ok(files)
}

fn expand(root: &Path, pattern: &str) -> Result<glob::Paths> {
    glob::glob(pattern_str(root, pattern, pattern)?.as_str()).map_err(|err| {
        Error::configuration(format!("invalid schema pattern `{pattern}`: {err}"))
    })
}

fn compile_pattern(root: &Path, original: &str, pattern: &str) -> Result<glob::Pattern> {
    glob::Pattern::new(pattern_str(root, original, pattern)?.as_str()).map_err(|err| {
        Error::configuration(format!("invalid schema pattern `{original}`: {err}"))
    })
}

fn pattern_str(root: &Path, original: &str, pattern: &str) -> Result<String> {
    root.join(pattern)
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| {
            Error::configuration(format!("schema pattern `{original}` is not valid UTF-8"))
        })
}

/// Loads each resolved file as a schema definition.
///
/// A file that fails to read or parse aborts the whole resolution; there is
/// no partial result.
pub(crate) async fn load_definitions(files: &[PathBuf]) -> Result<Vec<SchemaDefinition>> {
    let mut definitions = Vec::with_capacity(files.len());

    for path in files {
        let path_display = path.display().to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| Error::from(err).context(Error::schema_resolution(path_display.clone())))?;

        let definition = SchemaDefinition::from_json(&bytes)
            .map_err(|err| err.context(Error::schema_resolution(path_display.clone())))?;

        tracing::debug!(path = %path_display, model = %definition.name, "loaded schema definition");
        definitions.push(definition);
    }

    Ok(definitions)
}
