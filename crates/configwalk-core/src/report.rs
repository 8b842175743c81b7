//! Findings and the reporter collaborator
//!
//! Walkers never stop on a mismatch: every [`Finding`] goes to a
//! [`Reporter`], which decides whether to collect it or fail right away.

use std::fmt::{self, Display, Formatter};

use configwalk_graph::FieldPath;

/// One structural difference between two graphs
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difference {
    /// Where the graphs differ
    pub path: FieldPath,
    /// Rendered expected value
    pub want: String,
    /// Rendered actual value
    pub got: String,
}

impl Display for Difference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: -{} +{}", self.path, self.want, self.got)
    }
}

/// A non-fatal check failure
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Finding {
    /// A file-like field does not hold the expected path
    FileMismatch {
        /// Field (or list element) path
        path: FieldPath,
        /// Current value
        got: String,
        /// Expected value
        want: String,
    },
    /// A shared pointee could not be read, so nothing under it was checked
    Borrowed {
        /// Path of the pointer
        path: FieldPath,
    },
    /// Two graphs are not structurally equal
    Unequal {
        /// Every difference found
        differences: Vec<Difference>,
    },
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileMismatch { path, got, want } => write!(f, "{path} = {got:?}; want: {want:?}"),
            Self::Borrowed { path } => write!(f, "{path}: pointee is mutably borrowed, not checked"),
            Self::Unequal { differences } => {
                f.write_str("unexpected diff:")?;
                for difference in differences {
                    write!(f, "\n  {difference}")?;
                }
                Ok(())
            }
        }
    }
}

/// Receives findings as a walk produces them
pub trait Reporter {
    /// Record one finding
    fn report(&mut self, finding: Finding);
}

impl Reporter for Vec<Finding> {
    fn report(&mut self, finding: Finding) {
        self.push(finding);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, finding: Finding) {
        (**self).report(finding);
    }
}

/// Collect-and-continue reporter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collector {
    findings: Vec<Finding>,
}

impl Collector {
    /// Empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings in report order
    #[inline]
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// One human-readable line per finding
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    /// Whether nothing was reported
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Take the findings
    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl Reporter for Collector {
    fn report(&mut self, finding: Finding) {
        tracing::debug!(%finding, "finding reported");
        self.findings.push(finding);
    }
}

/// Reporter that panics on the first finding
///
/// For direct use inside `#[test]` functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl Reporter for FailFast {
    fn report(&mut self, finding: Finding) {
        panic!("{finding}");
    }
}
