/// Sink for coarse progress reports from long-running scans.
///
/// Detection reports once per image row with `fraction = rows_done / height`.
/// Implementations decide how (or whether) to render it; the core never
/// touches a terminal or UI itself.
pub trait Progress {
    fn report(&self, message: &str, fraction: f32);
}

/// Discards every report.
pub struct NullProgress;

impl Progress for NullProgress {
    fn report(&self, _message: &str, _fraction: f32) {}
}
