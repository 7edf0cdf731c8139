use std::fmt;

use chrono::{DateTime, Duration, Utc};
use exam_core::SampleGenerator;
use exam_core::model::{AssessmentId, AttemptSummary, Session, SubmitReason};
use storage::repository::{AssessmentRecord, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    assessment_id: AssessmentId,
    title: String,
    questions: u32,
    seed: u64,
    attempts: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAssessmentId { raw: String },
    InvalidQuestions { raw: String },
    InvalidSeed { raw: String },
    InvalidAttempts { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAssessmentId { raw } => {
                write!(f, "invalid --assessment-id value: {raw}")
            }
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidAttempts { raw } => write!(f, "invalid --attempts value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("EXAM_DB_URL").unwrap_or_else(|_| "sqlite:exam.sqlite3".into());
        let mut assessment_id =
            env_parse::<AssessmentId>("EXAM_ASSESSMENT_ID").unwrap_or(AssessmentId::new(1));
        let mut title =
            std::env::var("EXAM_TITLE").unwrap_or_else(|_| "Java Fundamentals".into());
        let mut questions = env_parse::<u32>("EXAM_QUESTIONS").unwrap_or(30);
        let mut seed = env_parse::<u64>("EXAM_SEED").unwrap_or(1);
        let mut attempts = env_parse::<u32>("EXAM_ATTEMPTS").unwrap_or(0);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--assessment-id" => {
                    let value = require_value(&mut args, "--assessment-id")?;
                    assessment_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAssessmentId { raw: value.clone() })?;
                }
                "--title" => {
                    title = require_value(&mut args, "--title")?;
                }
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    questions = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidQuestions { raw: value.clone() })?;
                }
                "--seed" => {
                    let value = require_value(&mut args, "--seed")?;
                    seed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                }
                "--attempts" => {
                    let value = require_value(&mut args, "--attempts")?;
                    attempts = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidAttempts { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            assessment_id,
            title,
            questions,
            seed,
            attempts,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:exam.sqlite3)");
    eprintln!("  --assessment-id <id>      Assessment id to upsert (default: 1)");
    eprintln!("  --title <text>            Assessment title (default: Java Fundamentals)");
    eprintln!("  --questions <n>           Number of sample questions (default: 30)");
    eprintln!("  --seed <n>                Seed for the sample generator (default: 1)");
    eprintln!("  --attempts <n>            Demo attempts to append to history (default: 0)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!(
        "  EXAM_DB_URL, EXAM_ASSESSMENT_ID, EXAM_TITLE, EXAM_QUESTIONS, EXAM_SEED, EXAM_ATTEMPTS"
    );
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let created_at = storage
        .assessments
        .get_assessment(args.assessment_id)
        .await?
        .map_or(now, |existing| existing.created_at);
    let record = AssessmentRecord::with_defaults(args.assessment_id, args.title.clone(), created_at);
    storage.assessments.upsert_assessment(&record).await?;

    let questions = SampleGenerator::new(args.seed).generate(args.questions)?;
    storage
        .assessments
        .replace_questions(args.assessment_id, &questions)
        .await?;

    // Demo attempts answer a growing prefix correctly and leave the rest blank.
    for i in 0..args.attempts {
        let config = record.config(args.questions);
        let mut session = Session::new(questions.clone(), config)?;
        let started_at = now - Duration::days(i64::from(i) + 1);
        session.start(started_at)?;
        let answered = (i + 1).saturating_mul(args.questions) / (args.attempts + 1);
        for question in questions.iter().take(answered as usize) {
            session.record_answer(question.id(), question.correct().value())?;
        }
        let report = session.finish(SubmitReason::Manual, started_at + Duration::minutes(20))?;
        let summary = AttemptSummary::from_report(args.assessment_id, report);
        storage.attempts.append_attempt(&summary).await?;
    }

    println!(
        "Seeded assessment {} with {} questions and {} attempts into {}",
        args.assessment_id, args.questions, args.attempts, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
