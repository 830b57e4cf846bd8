//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use sqlchain::ToolChoiceMode;

/// Optional overrides: model, temperature, tool choice, database path, recursion limit.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override model name.
    pub model: Option<String>,
    /// Override sampling temperature (0–2).
    pub temperature: Option<f32>,
    /// Override tool choice mode (auto, none, required).
    pub tool_choice: Option<ToolChoiceMode>,
    /// Override SQLite database path.
    pub db_path: Option<String>,
    /// Override maximum step invocations per run.
    pub recursion_limit: Option<usize>,
    /// Log node enter/exit and print the config summary.
    pub verbose: bool,
}
