//! WASM bindings for stacklatex
//!
//! This module provides JavaScript-accessible functions for a browser form
//! that collects LaTeX, transforms it once, and displays the result fields.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

/// Transform result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The transformed output (empty on failure)
    pub output: String,
    /// Whether the transform was successful
    pub success: bool,
    /// Error message if the transform failed
    pub error: Option<String>,
    /// Operation log, one `"<count>x <message>"` line per operation
    pub log: String,
    /// Instructions for pasting HTML output, if any
    pub info: Option<String>,
}

/// Summary of LaTeX check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}

/// Catalog entries a user may type
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct SupportedCommands {
    pub custom_commands: Vec<String>,
    pub replacements: Vec<String>,
    pub environments: Vec<String>,
    pub math_environments: Vec<String>,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Transform LaTeX into STACK-compatible LaTeX
///
/// # Returns
/// A `ConvertResult` object
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "transformLatex")]
pub fn transform_latex_wasm(input: &str) -> Result<JsValue, JsValue> {
    let result = crate::transform(input);
    let converted = ConvertResult {
        output: result.transformed_text,
        success: result.success,
        error: Some(result.error_message).filter(|s| !s.is_empty()),
        log: result.operation_log,
        info: Some(result.info_message).filter(|s| !s.is_empty()),
    };
    serde_wasm_bindgen::to_value(&converted).map_err(JsValue::from)
}

/// Check LaTeX for potential issues
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkLatex")]
pub fn check_latex_wasm(input: &str) -> Result<JsValue, JsValue> {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_latex(input);

    // Group diagnostics by level
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        let text = d.to_string();
        match d.level {
            DiagnosticLevel::Error => errors.push(text),
            DiagnosticLevel::Warning => warnings.push(text),
            DiagnosticLevel::Info => infos.push(text),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).map_err(JsValue::from)
}

/// List the commands and environments of the built-in catalog
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "supportedCommands")]
pub fn supported_commands_wasm() -> Result<JsValue, JsValue> {
    let catalog = &*crate::DEFAULT_CATALOG;
    let mut replacements: Vec<String> = catalog
        .replacements()
        .map(|(k, _)| k.to_string())
        .collect();
    let mut environments: Vec<String> = catalog
        .environments()
        .map(|(k, _)| k.to_string())
        .collect();
    let mut math_environments: Vec<String> = catalog
        .math_environments()
        .map(str::to_string)
        .collect();
    replacements.sort();
    environments.sort();
    math_environments.sort();

    let supported = SupportedCommands {
        custom_commands: catalog.custom_commands().map(|(k, _)| k.to_string()).collect(),
        replacements,
        environments,
        math_environments,
    };
    serde_wasm_bindgen::to_value(&supported).map_err(JsValue::from)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
