//! PL/CSQL Type Coercion Rules
//!
//! This module decides which code the compiler emits when a value of one
//! static type flows into a slot of another. It provides:
//! - The coercion matrix, a directional table of named conversions that
//!   mirrors the database server's own type promotion rules
//! - Resolution of a (from, to) pair into a `Coercion`
//! - Rendering of a `Coercion` around an already generated expression

use crate::{SimpleType, TypeSpec};
use indexmap::IndexMap;
use plcsql_diagnostics::{PLC0110, PLC0410, PlcsqlError, SourceLocation};
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::LazyLock;
use thiserror::Error;

/// Coercion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// No coercion exists between the two types
    #[error("Cannot coerce {from} to {to}")]
    Incompatible { from: SimpleType, to: SimpleType },

    /// Matrix entries without a routine in the runtime support library
    #[error("Support library is missing {} conversion routine(s): {}", .0.len(), .0.join(", "))]
    MissingRoutines(Vec<String>),
}

impl CoercionError {
    /// Convert to a crate-level error
    ///
    /// An incompatible pair is a compile error reported at `location`; a
    /// support library gap is a system error and ignores it.
    pub fn into_error(self, location: Option<SourceLocation>) -> PlcsqlError {
        match self {
            Self::Incompatible { .. } => {
                let message = self.to_string();
                match location {
                    Some(loc) => PlcsqlError::semantic_at(PLC0110, message, loc),
                    None => PlcsqlError::semantic(PLC0110, message),
                }
            }
            Self::MissingRoutines(_) => PlcsqlError::system(PLC0410, self.to_string()),
        }
    }
}

/// Type coercion result
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Code transformation applied to an expression of the source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coercion {
    /// No conversion needed
    Identity,
    /// Static cast to the given type; used for NULL so that overload
    /// selection in the generated code sees a concrete type
    Cast(SimpleType),
    /// Call to the runtime conversion routine `conv<from>To<to>`
    Conversion { from: SimpleType, to: SimpleType },
}

impl Coercion {
    /// Wrap `expr_code` with the code for this coercion
    pub fn generate(&self, expr_code: &str) -> String {
        match self {
            Self::Identity => expr_code.to_string(),
            Self::Cast(to) => format!("({}) {}", to.host_type(), expr_code),
            Self::Conversion { from, to } => {
                format!("{}({})", routine_name(*from, *to), expr_code)
            }
        }
    }

    /// Name of the runtime routine this coercion calls, if any
    pub fn routine_name(&self) -> Option<String> {
        match self {
            Self::Conversion { from, to } => Some(routine_name(*from, *to)),
            Self::Identity | Self::Cast(_) => None,
        }
    }

    /// Whether the converted value depends on session settings
    ///
    /// A temporal type on one side and a string or numeric type on the other
    /// depends on the session time zone and charset.
    pub fn is_session_sensitive(&self) -> bool {
        match self {
            Self::Conversion { from, to } => {
                let textual_or_numeric =
                    |ty: &SimpleType| ty.is_numeric() || *ty == SimpleType::String;
                (from.is_temporal() && textual_or_numeric(to))
                    || (to.is_temporal() && textual_or_numeric(from))
            }
            Self::Identity | Self::Cast(_) => false,
        }
    }
}

/// Runtime routine name for a conversion from `from` to `to`
pub fn routine_name(from: SimpleType, to: SimpleType) -> String {
    format!("conv{}To{}", from.pcs_name(), to.pcs_name())
}

type Targets = SmallVec<[SimpleType; 12]>;

/// Directional table of named conversions
///
/// An entry `A -> B` says the runtime can convert a value of type A into
/// type B. It says nothing about `B -> A`.
#[derive(Debug)]
pub struct CoercionMatrix {
    rows: IndexMap<SimpleType, Targets>,
}

static MATRIX: LazyLock<CoercionMatrix> = LazyLock::new(CoercionMatrix::build);

impl CoercionMatrix {
    /// The process-wide matrix
    pub fn global() -> &'static CoercionMatrix {
        &MATRIX
    }

    fn build() -> Self {
        use SimpleType::*;

        let mut rows = IndexMap::new();
        let mut row = |from: SimpleType, to: &[SimpleType]| {
            rows.insert(from, Targets::from_slice(to));
        };

        row(Datetime, &[Date, Time, Timestamp, String]);
        row(Date, &[Datetime, Timestamp, String]);
        row(Time, &[String]);
        row(Timestamp, &[Datetime, Date, Time, String]);
        row(Double, &[Time, Timestamp, Int, Short, String, Float, Numeric, Bigint]);
        row(Float, &[Time, Timestamp, Int, Short, String, Double, Numeric, Bigint]);
        row(Numeric, &[Timestamp, Int, Short, String, Double, Float, Bigint]);
        row(Bigint, &[Time, Timestamp, Int, Short, String, Double, Float, Numeric]);
        row(Int, &[Time, Timestamp, Short, String, Double, Float, Numeric, Bigint]);
        row(Short, &[Time, Timestamp, Int, String, Double, Float, Numeric, Bigint]);
        row(
            String,
            &[Datetime, Date, Time, Timestamp, Int, Short, Double, Float, Numeric, Bigint],
        );
        row(
            Object,
            &[Datetime, Date, Time, Timestamp, Int, Short, String, Double, Float, Numeric, Bigint],
        );

        Self { rows }
    }

    /// Destination types reachable from `from` by a named conversion
    pub fn targets(&self, from: SimpleType) -> &[SimpleType] {
        self.rows.get(&from).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, from: SimpleType, to: SimpleType) -> bool {
        self.targets(from).contains(&to)
    }

    /// Every (from, to) entry, rows in table order
    pub fn entries(&self) -> impl Iterator<Item = (SimpleType, SimpleType)> + '_ {
        self.rows
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolves coercions against the global matrix
#[derive(Debug, Clone, Copy)]
pub struct TypeCoercer {
    matrix: &'static CoercionMatrix,
}

impl Default for TypeCoercer {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCoercer {
    pub fn new() -> Self {
        Self {
            matrix: CoercionMatrix::global(),
        }
    }

    pub fn matrix(&self) -> &'static CoercionMatrix {
        self.matrix
    }

    /// Find the coercion from `from` to `to`
    ///
    /// # Panics
    ///
    /// Panics if either side is a `%TYPE` reference that has not been
    /// resolved yet.
    pub fn resolve(&self, from: &TypeSpec, to: &TypeSpec) -> CoercionResult<Coercion> {
        self.resolve_simple(from.concrete(), to.concrete())
    }

    /// Find the coercion between two concrete types
    pub fn resolve_simple(&self, from: SimpleType, to: SimpleType) -> CoercionResult<Coercion> {
        if from == to {
            return Ok(Coercion::Identity);
        }
        if from == SimpleType::Null {
            return Ok(Coercion::Cast(to));
        }
        if to == SimpleType::Object {
            return Ok(Coercion::Identity);
        }

        if self.matrix.contains(from, to) {
            Ok(Coercion::Conversion { from, to })
        } else {
            Err(CoercionError::Incompatible { from, to })
        }
    }
}
