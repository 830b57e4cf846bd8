//! Run config: LLM endpoint and model, SQLite database, run limits. Filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions) (CLI overrides) and
//! [`run_with_config`](crate::run_with_config).

use std::time::Duration;

use sqlchain::graph::DEFAULT_RECURSION_LIMIT;
use sqlchain::tool_source::DEFAULT_ROW_LIMIT;
use sqlchain::ToolChoiceMode;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Everything needed to build the LLM, the tool source and the pipeline.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    /// OpenAI API key.
    pub api_key: String,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Sampling temperature 0–2. Default: unset (use API default).
    pub temperature: Option<f32>,
    /// Tool choice mode sent when a step offers tools.
    pub tool_choice: Option<ToolChoiceMode>,
    /// SQLite database the metadata and execute_sql tools read.
    pub db_path: String,
    /// Maximum step invocations per run.
    pub recursion_limit: usize,
    /// Per-step time budget; unset means no timeout.
    pub node_timeout: Option<Duration>,
    /// Rows returned by one execute_sql call.
    pub sql_row_limit: usize,
    /// Print node enter/exit and the config summary to stderr.
    pub verbose: bool,
}

impl RunConfig {
    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to include `.env`.
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_API_BASE`, `OPENAI_MODEL`, `DB_PATH` have defaults.
    /// `OPENAI_TEMPERATURE`, `OPENAI_TOOL_CHOICE`, `RECURSION_LIMIT`, `NODE_TIMEOUT_SECS`,
    /// `SQL_ROW_LIMIT` optional; unparsable values fall back to the default.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env",
            )
        })?;
        let api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok());
        let tool_choice = std::env::var("OPENAI_TOOL_CHOICE")
            .ok()
            .and_then(|s| s.parse().ok());
        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "data.db".to_string());
        let recursion_limit = std::env::var("RECURSION_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RECURSION_LIMIT);
        let node_timeout = std::env::var("NODE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let sql_row_limit = std::env::var("SQL_ROW_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ROW_LIMIT);
        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            tool_choice,
            db_path,
            recursion_limit,
            node_timeout,
            sql_row_limit,
            verbose: false,
        })
    }

    /// Apply optional overrides from `RunOptions`; only set fields override.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(model) = &options.model {
            self.model = model.clone();
        }
        if let Some(t) = options.temperature {
            self.temperature = Some(t);
        }
        if let Some(tc) = options.tool_choice {
            self.tool_choice = Some(tc);
        }
        if let Some(path) = &options.db_path {
            self.db_path = path.clone();
        }
        if let Some(limit) = options.recursion_limit {
            self.recursion_limit = limit;
        }
        self.verbose = options.verbose;
    }

    /// Human-readable summary (API key masked) printed in verbose mode.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("model: {}", self.model),
            format!("api_base: {}", self.api_base),
            format!("api_key: {}", mask_key(&self.api_key)),
            format!(
                "temperature: {}",
                self.temperature
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "default".to_string())
            ),
            format!("db_path: {}", self.db_path),
            format!("recursion_limit: {}", self.recursion_limit),
            format!("sql_row_limit: {}", self.sql_row_limit),
        ];
        if let Some(timeout) = self.node_timeout {
            lines.push(format!("node_timeout: {}s", timeout.as_secs()));
        }
        lines.join("\n")
    }
}

fn mask_key(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{}", tail)
    }
}
