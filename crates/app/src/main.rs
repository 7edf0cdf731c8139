use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::AssessmentId;
use exam_core::time::format_elapsed;
use services::{AppServices, AssessmentCatalog, AttemptHistoryService, Clock, ConfigOverrides};
use thiserror::Error;
use ui::{App, UiApp, build_app_context};

mod logging;

use logging::{LogConfig, LogError, LogFormat, init_logging};

const HISTORY_LIMIT: u32 = 20;

#[derive(Debug, Error)]
enum ArgsError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },
    #[error("unknown argument: {0}")]
    UnknownArg(String),
    #[error("invalid {flag} value: {raw}")]
    InvalidNumber { flag: &'static str, raw: String },
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error(transparent)]
    Log(#[from] LogError),
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn assessment_id(&self) -> AssessmentId {
        self.services.assessment_id()
    }

    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn catalog(&self) -> Arc<AssessmentCatalog> {
        self.services.catalog()
    }

    fn history(&self) -> Arc<AttemptHistoryService> {
        self.services.history()
    }
}

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    assessment_id: AssessmentId,
    overrides: ConfigOverrides,
    log: LogConfig,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [options]");
    eprintln!("  cargo run -p app -- history [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>          default sqlite:exam.sqlite3");
    eprintln!("  --assessment-id <id>       default 1");
    eprintln!("  --questions <n>            sample bank size when no bank is stored");
    eprintln!("  --duration-secs <n>");
    eprintln!("  --violation-limit <n>");
    eprintln!("  --pass-threshold <0-100>");
    eprintln!("  --log <filter>             default info");
    eprintln!("  --log-format <json|pretty> default json");
    eprintln!("  --log-file <path>          default stderr");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_DB_URL, EXAM_ASSESSMENT_ID, EXAM_QUESTIONS, EXAM_DURATION_SECS,");
    eprintln!("  EXAM_VIOLATION_LIMIT, EXAM_PASS_THRESHOLD, EXAM_LOG, EXAM_LOG_FORMAT, EXAM_LOG_FILE");
    eprintln!();
    eprintln!("Seed a question bank with: cargo run -p storage --bin seed -- --help");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let db_url = std::env::var("EXAM_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:exam.sqlite3".into()), normalize_sqlite_url);
        let assessment_id =
            env_parse::<AssessmentId>("EXAM_ASSESSMENT_ID").unwrap_or(AssessmentId::new(1));
        let overrides = ConfigOverrides {
            total_questions: env_parse("EXAM_QUESTIONS"),
            duration_secs: env_parse("EXAM_DURATION_SECS"),
            violation_limit: env_parse("EXAM_VIOLATION_LIMIT"),
            pass_threshold: env_parse("EXAM_PASS_THRESHOLD"),
        };
        let mut log = LogConfig::default();
        if let Ok(level) = std::env::var("EXAM_LOG") {
            log.level = level;
        }
        if let Ok(format) = std::env::var("EXAM_LOG_FORMAT") {
            log.format = format.parse::<LogFormat>()?;
        }
        log.output_path = std::env::var_os("EXAM_LOG_FILE").map(PathBuf::from);

        Ok(Self {
            db_url,
            assessment_id,
            overrides,
            log,
        })
    }

    /// Flags override the environment.
    fn parse(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    self.db_url = normalize_sqlite_url(value);
                }
                "--assessment-id" => {
                    let value = require_value(args, "--assessment-id")?;
                    self.assessment_id = parse_number("--assessment-id", value)?;
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    self.overrides.total_questions = Some(parse_number("--questions", value)?);
                }
                "--duration-secs" => {
                    let value = require_value(args, "--duration-secs")?;
                    self.overrides.duration_secs = Some(parse_number("--duration-secs", value)?);
                }
                "--violation-limit" => {
                    let value = require_value(args, "--violation-limit")?;
                    self.overrides.violation_limit =
                        Some(parse_number("--violation-limit", value)?);
                }
                "--pass-threshold" => {
                    let value = require_value(args, "--pass-threshold")?;
                    self.overrides.pass_threshold = Some(parse_number("--pass-threshold", value)?);
                }
                "--log" => self.log.level = require_value(args, "--log")?,
                "--log-format" => {
                    self.log.format = require_value(args, "--log-format")?.parse()?;
                }
                "--log-file" => {
                    self.log.output_path = Some(PathBuf::from(require_value(args, "--log-file")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn print_history(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let rows = services
        .history()
        .list(services.assessment_id(), HISTORY_LIMIT)
        .await?;
    if rows.is_empty() {
        println!("no attempts for assessment {}", services.assessment_id());
        return Ok(());
    }
    for row in rows {
        let summary = &row.summary;
        println!(
            "#{:<4} {}  {:>3}%  {:<2}  {}  {:>2}/{:<2}  {:>5}  {}  {}",
            row.id,
            summary.completed_at().format("%Y-%m-%d %H:%M"),
            summary.score(),
            summary.grade(),
            if summary.passed() { "PASS" } else { "FAIL" },
            summary.correct(),
            summary.total(),
            format_elapsed(summary.time_taken_secs()),
            summary.reason(),
            summary.assessment_code(),
        );
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.to_string())
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env()
        .and_then(|args| args.parse(&mut iter))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    init_logging(&parsed.log)?;
    tracing::info!(
        command = ?cmd,
        db = %parsed.db_url,
        assessment = %parsed.assessment_id,
        "starting"
    );

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::system(),
        parsed.assessment_id,
        parsed.overrides,
    )
    .await?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // Some dev setups default the window to always-on-top.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Technical Test")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::History => print_history(&services).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
