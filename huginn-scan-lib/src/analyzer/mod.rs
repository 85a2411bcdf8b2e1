pub mod curves;

pub use curves::{AnalyzerCurves, AnalyzerResultCurves, ProbeOutcome};

/// Registration metadata of an analyzer, as listed by the command line tool
pub trait Analyzer {
    /// Subcommand name
    fn name() -> &'static str;

    /// One line description
    fn help() -> &'static str;
}
