use std::fmt::Write;

use crate::analyzer::AnalyzerResultCurves;
use crate::error::Result;

pub use crate::config::OutputFormat;

/// Renders analysis results for the terminal or for machine consumption
pub fn render(results: &[AnalyzerResultCurves], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Markdown => Ok(render_markdown(results)),
    }
}

fn render_markdown(results: &[AnalyzerResultCurves]) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = writeln!(out, "## {} ({})\n", result.target, result.protocol_version);
        let extension = match result.extension_supported {
            Some(true) => "yes",
            Some(false) => "no",
            None => "unknown",
        };
        let _ = writeln!(out, "Supported groups extension honored: {extension}\n");
        if result.curves.is_empty() {
            out.push_str("No supported curves found.\n");
            continue;
        }
        out.push_str("| # | Curve | Code |\n|---|-------|------|\n");
        for (n, curve) in result.curves.iter().enumerate() {
            let _ = writeln!(out, "| {} | {} | {:#06x} |", n + 1, curve, curve.code());
        }
    }
    out
}
