//! Python bindings for stacklatex

use pyo3::prelude::*;

/// Outcome of one transform call
#[pyclass(frozen, get_all, module = "stacklatex._native")]
#[derive(Clone)]
pub struct TransformResult {
    pub transformed_text: String,
    pub success: bool,
    pub error_message: String,
    pub operation_log: String,
    pub info_message: String,
}

#[pymethods]
impl TransformResult {
    fn __repr__(&self) -> String {
        if self.success {
            format!("TransformResult(success=True, text={:?})", self.transformed_text)
        } else {
            format!("TransformResult(success=False, error={:?})", self.error_message)
        }
    }

    fn __bool__(&self) -> bool {
        self.success
    }
}

impl From<stacklatex::TransformResult> for TransformResult {
    fn from(result: stacklatex::TransformResult) -> Self {
        Self {
            transformed_text: result.transformed_text,
            success: result.success,
            error_message: result.error_message,
            operation_log: result.operation_log,
            info_message: result.info_message,
        }
    }
}

/// Transform LaTeX into the dialect accepted by STACK
#[pyfunction]
fn transform(input: &str) -> TransformResult {
    stacklatex::transform(input).into()
}

/// Check LaTeX and return `(level, message, line, column)` tuples
#[pyfunction]
fn check(input: &str) -> Vec<(String, String, Option<usize>, Option<usize>)> {
    stacklatex::diagnostics::check_latex(input)
        .diagnostics
        .into_iter()
        .map(|d| (d.level.to_string(), d.message, d.line, d.column))
        .collect()
}

#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<TransformResult>()?;
    m.add_function(wrap_pyfunction!(transform, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
