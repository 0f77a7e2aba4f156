//! PL/CSQL type specifiers
//!
//! `SimpleType` is the closed set of primitive types the compiler knows how
//! to coerce between. `TypeSpec` adds the `%TYPE` form, which names "the type
//! of variable or column X" and is bound to a concrete type during semantic
//! analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive PL/CSQL types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SimpleType {
    /// Top type; every value can be treated as an Object
    Object,
    /// Type of the NULL literal
    Null,
    Boolean,
    String,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Bigint,
    /// Fixed-point decimal
    Numeric,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    Date,
    Time,
    Timestamp,
    Datetime,
}

impl SimpleType {
    /// Every primitive type, in declaration order
    pub const ALL: [SimpleType; 14] = [
        Self::Object,
        Self::Null,
        Self::Boolean,
        Self::String,
        Self::Short,
        Self::Int,
        Self::Bigint,
        Self::Numeric,
        Self::Float,
        Self::Double,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Datetime,
    ];

    /// Canonical short name used to build conversion routine names
    pub const fn pcs_name(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Bigint => "Bigint",
            Self::Numeric => "Numeric",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Timestamp => "Timestamp",
            Self::Datetime => "Datetime",
        }
    }

    /// Type name as rendered in generated code
    pub const fn host_type(&self) -> &'static str {
        match self {
            Self::Object | Self::Null => "Object",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Short => "Short",
            Self::Int => "Integer",
            Self::Bigint => "Long",
            Self::Numeric => "BigDecimal",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Timestamp | Self::Datetime => "Timestamp",
        }
    }

    /// Look up a type by its canonical name or a common SQL spelling
    ///
    /// Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "object" => Self::Object,
            "null" => Self::Null,
            "boolean" | "bool" => Self::Boolean,
            "string" | "varchar" | "char" => Self::String,
            "short" | "smallint" => Self::Short,
            "int" | "integer" => Self::Int,
            "bigint" => Self::Bigint,
            "numeric" | "decimal" => Self::Numeric,
            "float" | "real" => Self::Float,
            "double" => Self::Double,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "datetime" => Self::Datetime,
            _ => return None,
        };
        Some(ty)
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Short | Self::Int | Self::Bigint | Self::Numeric | Self::Float | Self::Double
        )
    }

    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::Timestamp | Self::Datetime)
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pcs_name())
    }
}

/// A `%TYPE` reference: the type of a named variable or column
///
/// Starts unresolved. Semantic analysis binds it exactly once; later
/// attempts to bind a different type leave the first binding in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PercentType {
    /// Referenced variable or column, e.g. `emp.salary`
    pub reference: String,
    resolved: Option<SimpleType>,
}

impl PercentType {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            resolved: None,
        }
    }

    /// Bind the referenced type, returning the effective binding
    pub fn resolve(&mut self, ty: SimpleType) -> SimpleType {
        match self.resolved {
            Some(bound) => {
                if bound != ty {
                    log::warn!(
                        "{}%TYPE already resolved to {}, ignoring rebind to {}",
                        self.reference,
                        bound,
                        ty
                    );
                }
                bound
            }
            None => {
                self.resolved = Some(ty);
                ty
            }
        }
    }

    pub fn resolved(&self) -> Option<SimpleType> {
        self.resolved
    }
}

/// Type specifier attached to PL/CSQL expressions and declarations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeSpec {
    Simple(SimpleType),
    Percent(PercentType),
}

impl TypeSpec {
    /// Create a `%TYPE` reference that has not been resolved yet
    pub fn percent(reference: impl Into<String>) -> Self {
        Self::Percent(PercentType::new(reference))
    }

    /// Concrete type, if this spec is simple or an already resolved `%TYPE`
    pub fn resolved(&self) -> Option<SimpleType> {
        match self {
            Self::Simple(ty) => Some(*ty),
            Self::Percent(p) => p.resolved(),
        }
    }

    /// Concrete type of this spec
    ///
    /// # Panics
    ///
    /// Panics if this is a `%TYPE` reference that semantic analysis never
    /// resolved. Reaching coercion with such a type is a compiler bug.
    pub fn concrete(&self) -> SimpleType {
        match self {
            Self::Simple(ty) => *ty,
            Self::Percent(p) => p.resolved().unwrap_or_else(|| {
                panic!("{}%TYPE used before its type was resolved", p.reference)
            }),
        }
    }
}

impl From<SimpleType> for TypeSpec {
    fn from(ty: SimpleType) -> Self {
        Self::Simple(ty)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(ty) => write!(f, "{}", ty),
            Self::Percent(p) => match p.resolved() {
                Some(ty) => write!(f, "{}%TYPE ({})", p.reference, ty),
                None => write!(f, "{}%TYPE", p.reference),
            },
        }
    }
}
