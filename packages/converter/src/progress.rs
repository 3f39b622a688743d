use crate::converter::ConversionSummary;

/// Receives the human-readable trace of a conversion.
///
/// Structured diagnostics go through `tracing`; this is the step-by-step
/// report a user watches while a component converts.
pub trait Progress {
    /// A component conversion begins
    fn start(&self, component: &str, output_name: &str, aliases: &[String]);

    /// A new pipeline stage
    fn step(&self, title: &str);

    fn ok(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn finish(&self, summary: &ConversionSummary);
}

/// Discards everything
pub struct Silent;

impl Progress for Silent {
    fn start(&self, _component: &str, _output_name: &str, _aliases: &[String]) {}
    fn step(&self, _title: &str) {}
    fn ok(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn finish(&self, _summary: &ConversionSummary) {}
}
