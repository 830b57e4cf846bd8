//! sqlchain binary: parse the command line, run the pipeline and print the answer.
//!
//! One-shot: `sqlchain "I need last quarter's sales by region"`.
//! Interactive: `sqlchain --interactive` keeps the conversation as chat history.

use std::io::Write;

use clap::Parser;
use sqlchain_cli::{conversation_with_config, Error, RunConfig, RunOptions};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "sqlchain")]
#[command(about = "Gather data requirements, generate SQL, run it and format the results")]
struct Args {
    /// User message (may also be given as positional words)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Earlier conversation line, e.g. "User: I need sales data" (repeatable)
    #[arg(long, value_name = "LINE")]
    history: Vec<String>,

    /// Chat until an empty line or EOF
    #[arg(short, long)]
    interactive: bool,

    /// Log node enter/exit and debug traces to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Model name (overrides OPENAI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature 0–2 (overrides OPENAI_TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    /// SQLite database for the tools (overrides DB_PATH)
    #[arg(long, value_name = "PATH")]
    db_path: Option<String>,

    /// Positional user message (when -m/--message is not used)
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

impl Args {
    fn message(&self) -> Option<String> {
        if let Some(m) = &self.message {
            return Some(m.clone());
        }
        let joined = self.rest.join(" ").trim().to_string();
        (!joined.is_empty()).then_some(joined)
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            db_path: self.db_path.clone(),
            verbose: self.verbose,
            ..Default::default()
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let default = if verbose { "info,sqlchain=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(stderr_layer).init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    init_tracing(args.verbose);

    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(&args.options());
    let mut conversation = conversation_with_config(&config)?.with_history(args.history.clone());

    if !args.interactive {
        let Some(input) = args.message() else {
            eprintln!("error: no message given (use -m, a positional message or --interactive)");
            std::process::exit(2);
        };
        match conversation.send(&input).await {
            Ok(answer) => println!("{}", answer),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let mut first = args.message();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = match first.take() {
            Some(m) => m,
            None => {
                print!("User: ");
                std::io::stdout().flush()?;
                match lines.next_line().await? {
                    Some(line) if !line.trim().is_empty() => line.trim().to_string(),
                    _ => break,
                }
            }
        };
        match conversation.send(&input).await {
            Ok(answer) => println!("Assistant: {}", answer),
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}
