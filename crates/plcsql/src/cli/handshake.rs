//! Handshake command implementation

use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use plcsql_diagnostics::PlcsqlError;
use plcsql_server::{ServerEnvironment, SysParamTable};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for handshake command
pub struct HandshakeConfig {
    pub file: PathBuf,
    pub format: OutputFormat,
}

/// Decode a handshake dump into a session environment
pub fn load(file: &Path) -> Result<ServerEnvironment> {
    let bytes = fs::read(file)
        .with_context(|| format!("Failed to read handshake file: {}", file.display()))?;
    Ok(ServerEnvironment::new(SysParamTable::unpack(&bytes)))
}

pub fn report_json(env: &ServerEnvironment) -> Value {
    let params = env.parameters();
    let parameters: Vec<Value> = params
        .iter()
        .map(|p| {
            json!({
                "id": p.id(),
                "name": p.known_id().map(|k| k.name()),
                "type": p.value().tag().name(),
                "value": p.value().to_string(),
            })
        })
        .collect();
    let rejected: Vec<Value> = params
        .rejected()
        .iter()
        .map(|r| {
            json!({
                "index": r.index,
                "param_id": r.param_id,
                "code": PlcsqlError::from(r.error.clone()).code().to_string(),
                "message": r.error.to_string(),
                "recoverable": r.error.is_recoverable(),
            })
        })
        .collect();

    json!({
        "parameters": parameters,
        "rejected": rejected,
        "time_zone": env.time_zone().to_string(),
        "charset": env.charset_string(),
        "encoding": env.encoding().name(),
    })
}

pub fn report_text(env: &ServerEnvironment) -> String {
    let params = env.parameters();
    let mut lines = vec![output::format_heading(&format!(
        "Parameters ({}):",
        params.len()
    ))];
    lines.extend(params.iter().map(|p| format!("  {}", p)));

    if !params.rejected().is_empty() {
        lines.push(output::format_heading(&format!(
            "Rejected ({}):",
            params.rejected().len()
        )));
        lines.extend(
            params
                .rejected()
                .iter()
                .map(|r| format!("  {}", output::format_warning(&r.to_string()))),
        );
    }

    lines.push(format!("Time zone: {}", env.time_zone()));
    lines.push(format!(
        "Charset: {} ({})",
        env.charset_string(),
        env.encoding().name()
    ));
    lines.join("\n")
}

/// Decode a handshake dump and print what the session would see
pub fn handshake(config: HandshakeConfig) -> Result<()> {
    let env = load(&config.file)?;
    let content = match config.format {
        OutputFormat::Text => report_text(&env),
        OutputFormat::Json => output::format_json(&report_json(&env))?,
    };
    println!("{}", content);
    Ok(())
}
