//! Language-mode enforcement for MQL files

use crate::config::Config;
use crate::host::{DocumentHost, HostError, LanguageId};
use tracing::debug;

/// File extensions recognized as MQL sources, matched case-sensitively
pub const MQL_EXTENSIONS: [&str; 3] = [".mq4", ".mq5", ".mqh"];

/// Whether `file_name` names an MQL source file
pub fn is_mql_file(file_name: &str) -> bool {
    MQL_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

/// Whether the document is an MQL file currently tagged as C++
///
/// Every scan path runs behind this gate: replacements only make sense on
/// documents the C/C++ tooling is active on.
pub fn is_mql_as_cpp(host: &dyn DocumentHost) -> bool {
    host.language() == LanguageId::Cpp && is_mql_file(&host.file_name())
}

/// Retag an MQL document to C++ so the language tooling activates on it
///
/// One-shot and idempotent; disabled entirely when `force_cpp_mode` is off.
/// Returns whether a retag was requested.
pub async fn ensure_cpp_mode(host: &dyn DocumentHost, config: &Config) -> Result<bool, HostError> {
    if !config.force_cpp_mode {
        return Ok(false);
    }
    if !host.is_file_backed() {
        return Ok(false);
    }
    let name = host.file_name();
    if !is_mql_file(&name) || host.language() == LanguageId::Cpp {
        return Ok(false);
    }
    debug!(file = %name, "forcing language mode to c++");
    host.set_language(LanguageId::Cpp).await?;
    Ok(true)
}
