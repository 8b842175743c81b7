//! The "apply base directory" capability
//!
//! Configuration values that hold relative file paths implement
//! [`SetDirectory`] and resolve those paths with [`join_dir`].

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::value::Value;

/// Resolve relative file paths against a base directory
///
/// Implementations are expected to be idempotent when `dir` is absolute.
pub trait SetDirectory {
    /// Apply `dir` to every file path this value owns
    fn set_directory(&mut self, dir: &str);
}

/// A graph value that also carries the directory capability
///
/// `Box<dyn Config>` is the polymorphic slot type of configuration graphs.
pub trait Config: Value + SetDirectory {}

impl<T: Value + SetDirectory> Config for T {}

impl<T: SetDirectory> SetDirectory for Option<T> {
    fn set_directory(&mut self, dir: &str) {
        if let Some(inner) = self {
            inner.set_directory(dir);
        }
    }
}

impl<T: SetDirectory> SetDirectory for Rc<RefCell<T>> {
    fn set_directory(&mut self, dir: &str) {
        if let Ok(mut inner) = self.try_borrow_mut() {
            inner.set_directory(dir);
        } else {
            tracing::warn!(dir, "shared config is already borrowed, directory not applied");
        }
    }
}

impl SetDirectory for Box<dyn Config> {
    #[inline]
    fn set_directory(&mut self, dir: &str) {
        (**self).set_directory(dir);
    }
}

/// Join `path` onto `dir` unless it is empty or already absolute
#[must_use]
pub fn join_dir(dir: &str, path: &str) -> String {
    if path.is_empty() || Path::new(path).is_absolute() {
        return path.to_owned();
    }
    Path::new(dir).join(path).to_string_lossy().into_owned()
}
