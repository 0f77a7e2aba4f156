//! Coerce command implementation

use super::output;
use anyhow::{Result, anyhow};
use colored::Colorize;
use plcsql_diagnostics::PlcsqlError;
use plcsql_types::{Coercion, SimpleType, TypeCoercer};

/// Configuration for coerce command
pub struct CoerceConfig {
    pub from: String,
    pub to: String,
    pub expr: String,
    pub verbose: bool,
}

/// Parse a type name given on the command line
pub fn parse_type(name: &str) -> Result<SimpleType> {
    SimpleType::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = SimpleType::ALL.iter().map(SimpleType::pcs_name).collect();
        anyhow!("Unknown type '{}'. Expected one of: {}", name, known.join(", "))
    })
}

/// Resolve the coercion between two named types
///
/// The outer error is for bad arguments; the inner one is an incompatible
/// pair, reported as a compile error would be.
pub fn resolve(from: &str, to: &str) -> Result<std::result::Result<Coercion, PlcsqlError>> {
    let from = parse_type(from)?;
    let to = parse_type(to)?;
    Ok(TypeCoercer::new()
        .resolve_simple(from, to)
        .map_err(|e| e.into_error(None)))
}

/// One-line description of a coercion
pub fn describe(coercion: &Coercion) -> String {
    match coercion {
        Coercion::Identity => "identity".to_string(),
        Coercion::Cast(to) => format!("cast to {}", to.host_type()),
        Coercion::Conversion { .. } => {
            let routine = coercion.routine_name().unwrap_or_default();
            if coercion.is_session_sensitive() {
                format!("conversion via {} (session sensitive)", routine)
            } else {
                format!("conversion via {}", routine)
            }
        }
    }
}

/// Resolve a coercion and print the generated code
///
/// Exits with status 1 when the types are incompatible.
pub fn coerce(config: CoerceConfig) -> Result<()> {
    match resolve(&config.from, &config.to)? {
        Ok(coercion) => {
            if config.verbose {
                eprintln!("{} {}", "Coercion:".cyan(), describe(&coercion));
            }
            println!("{}", coercion.generate(&config.expr));
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", output::format_diagnostic(&err.to_diagnostic()));
            std::process::exit(1);
        }
    }
}
