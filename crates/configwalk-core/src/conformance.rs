//! The set-directory conformance check
//!
//! Proves that a configuration root's own [`SetDirectory`] implementation
//! reaches every value the generic walker reaches, and resolves every field
//! the naming convention calls a file.

use std::path::{Path, PathBuf};

use configwalk_graph::{SetDirectory, Value};
use path_clean::PathClean;

use crate::assertion::assert_file;
use crate::classify::Classifier;
use crate::error::{BoxError, ConformanceError, Result};
use crate::propagate::set_directory;
use crate::report::Reporter;
use crate::rewrite::set_file;

/// Check `C`'s [`SetDirectory`] implementation against `file`
///
/// Loads `file` twice. The first graph gets [`set_file`] with the base name
/// then the generic [`set_directory`] with the parent directory; the second
/// gets [`set_file`] then its own `set_directory`. `assert_equal` compares
/// the two, and [`assert_file`] checks the second against the absolute path.
/// Both checks always run and report through `reporter`.
///
/// Returns `Ok(true)` if nothing was reported.
///
/// # Errors
/// Fails without reporting anything if the path cannot be made absolute or
/// has no file name, or if either load fails.
pub fn test_set_directory<C, E, L, A>(
    reporter: &mut dyn Reporter,
    file: impl AsRef<Path>,
    mut load: L,
    mut assert_equal: A,
    classifier: &Classifier,
) -> Result<bool>
where
    C: Value + SetDirectory,
    E: Into<BoxError>,
    L: FnMut(&Path) -> std::result::Result<C, E>,
    A: FnMut(&mut dyn Reporter, &C, &C) -> bool,
{
    let file = absolute(file.as_ref())?;
    let full = utf8(&file)?;
    let base = file
        .file_name()
        .ok_or_else(|| ConformanceError::NoFileName(file.clone()))?
        .to_str()
        .ok_or_else(|| ConformanceError::NonUtf8Path(file.clone()))?;
    let dir = file.parent().map(utf8).transpose()?.unwrap_or_default();
    tracing::info!(file = full, "checking set directory");

    let mut want = load_file(&mut load, &file)?;
    set_file(&mut want, base, classifier);
    set_directory(&mut want, dir);

    let mut got = load_file(&mut load, &file)?;
    set_file(&mut got, base, classifier);
    got.set_directory(dir);

    let equal = assert_equal(&mut *reporter, &want, &got);
    let resolved = assert_file(reporter, &got, full, classifier);
    tracing::debug!(equal, resolved, "set directory checked");
    Ok(equal && resolved)
}

fn load_file<C, E, L>(load: &mut L, file: &Path) -> Result<C>
where
    E: Into<BoxError>,
    L: FnMut(&Path) -> std::result::Result<C, E>,
{
    load(file).map_err(|err| {
        let source: BoxError = err.into();
        tracing::warn!(file = %file.display(), error = %source, "load failed");
        ConformanceError::Load {
            path: file.to_path_buf(),
            source,
        }
    })
}

/// Absolute, lexically cleaned form of `path`
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.clean());
    }
    let cwd = std::env::current_dir().map_err(|source| ConformanceError::AbsolutePath {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path).clean())
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| ConformanceError::NonUtf8Path(path.to_path_buf()))
}
