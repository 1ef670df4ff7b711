use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_services::{
    DEFAULT_FEEDBACK_DELAY, GenerativeQuestionSource, QuestionSourceConfig, QuizController,
    parse_timeout_secs,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidBaseUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(raw: String, flag: &'static str) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

struct DesktopApp {
    quiz: Arc<QuizController>,
}

impl UiApp for DesktopApp {
    fn quiz(&self) -> Arc<QuizController> {
        Arc::clone(&self.quiz)
    }
}

#[derive(Debug, Default)]
struct Args {
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    feedback_delay: Option<Duration>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--model <name>] [--base-url <url>]");
    eprintln!("                      [--timeout-secs <secs>] [--feedback-ms <ms>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url https://api.openai.com/v1");
    eprintln!("  --model gpt-4o-mini");
    eprintln!("  --timeout-secs 30");
    eprintln!("  --feedback-ms 1500");
    eprintln!();
    eprintln!("Environment (a .env file is loaded if present):");
    eprintln!("  QUIZ_AI_API_KEY (required), QUIZ_AI_BASE_URL, QUIZ_AI_MODEL,");
    eprintln!("  QUIZ_AI_TIMEOUT_SECS, QUIZ_FEEDBACK_MS, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            feedback_delay: std::env::var("QUIZ_FEEDBACK_MS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_millis),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--model" => {
                    parsed.model = Some(require_value(args, "--model")?);
                }
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidBaseUrl { raw: value });
                    }
                    parsed.base_url = Some(value);
                }
                "--timeout-secs" => {
                    let value = require_value(args, "--timeout-secs")?;
                    let timeout = parse_timeout_secs(&value).ok_or(ArgsError::InvalidNumber {
                        flag: "--timeout-secs",
                        raw: value,
                    })?;
                    parsed.timeout = Some(timeout);
                }
                "--feedback-ms" => {
                    let value = require_value(args, "--feedback-ms")?;
                    parsed.feedback_delay =
                        Some(Duration::from_millis(parse_number(value, "--feedback-ms")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Apply CLI overrides on top of the env-derived config.
    fn source_config(&self) -> Option<QuestionSourceConfig> {
        let mut config = QuestionSourceConfig::from_env()?;
        if let Some(model) = &self.model {
            config.model.clone_from(model);
        }
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        Some(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = parsed.source_config();
    match &config {
        Some(config) => info!(model = %config.model, base_url = %config.base_url, "question source configured"),
        None => warn!("QUIZ_AI_API_KEY is not set; every quiz will fail to load"),
    }
    let source = Arc::new(GenerativeQuestionSource::new(config)?);
    let quiz = Arc::new(
        QuizController::new(source)
            .with_feedback_delay(parsed.feedback_delay.unwrap_or(DEFAULT_FEEDBACK_DELAY)),
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { quiz });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Topic Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
