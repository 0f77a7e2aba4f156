//! Check-support command implementation

use super::output;
use anyhow::{Context, Result};
use plcsql_types::{CoercionResult, SupportLibrary};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for check-support command
pub struct CheckSupportConfig {
    pub file: PathBuf,
    pub verbose: bool,
}

/// Verify a routine manifest against the coercion matrix
pub fn check(file: &Path) -> Result<(SupportLibrary, CoercionResult<()>)> {
    let manifest = fs::read_to_string(file)
        .with_context(|| format!("Failed to read routine manifest: {}", file.display()))?;
    let library = SupportLibrary::from_manifest(&manifest);
    let result = library.verify();
    Ok((library, result))
}

/// Check that the support library exports every conversion routine
///
/// Exits with status 1 when routines are missing.
pub fn check_support(config: CheckSupportConfig) -> Result<()> {
    let (library, result) = check(&config.file)?;
    if config.verbose {
        eprintln!("Read {} routine name(s) from {}", library.len(), config.file.display());
    }

    match result {
        Ok(()) => {
            println!(
                "{}",
                output::format_success(&format!(
                    "All conversion routines present in {}",
                    config.file.display()
                ))
            );
            Ok(())
        }
        Err(err) => {
            let diagnostic = err.into_error(None).to_diagnostic();
            eprintln!("{}", output::format_diagnostic(&diagnostic));
            std::process::exit(1);
        }
    }
}
