//! Runtime support library manifest
//!
//! Compiled procedures call `conv<From>To<To>` routines for every
//! `Coercion::Conversion`. Those routines live in a separately built support
//! library; this module checks that the library exports one for every entry
//! of the coercion matrix.

use crate::coercion::{CoercionError, CoercionMatrix, CoercionResult, routine_name};
use indexmap::IndexSet;

/// Set of conversion routine names exported by the support library
#[derive(Debug, Clone, Default)]
pub struct SupportLibrary {
    routines: IndexSet<String>,
}

impl SupportLibrary {
    pub fn new<I, S>(routines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routines: routines.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a manifest with one routine name per line
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn from_manifest(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn contains(&self, routine: &str) -> bool {
        self.routines.contains(routine)
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    /// Routine names the matrix requires but the library does not export
    pub fn missing(&self, matrix: &CoercionMatrix) -> Vec<String> {
        required_routines(matrix)
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Check the library against the global matrix
    pub fn verify(&self) -> CoercionResult<()> {
        let missing = self.missing(CoercionMatrix::global());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoercionError::MissingRoutines(missing))
        }
    }
}

/// Routine names needed by `matrix`, one per entry
pub fn required_routines(matrix: &CoercionMatrix) -> impl Iterator<Item = String> + '_ {
    matrix.entries().map(|(from, to)| routine_name(from, to))
}
