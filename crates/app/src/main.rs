mod telemetry;
mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use quiz_core::model::QuizSettings;
use services::{AppServices, Clock, QuizService, QuizSession, SessionError, SessionEvent, SessionPhase};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use terminal::Input;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidSeconds { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidSeconds { raw } => write!(f, "invalid --seconds value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--questions <path>] [--db <sqlite_url>] [--count <n>] [--seconds <n>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions questions.json");
    eprintln!("  --db        (none, results kept in memory)");
    eprintln!("  --count     {}", QuizSettings::DEFAULT_QUESTIONS_PER_QUIZ);
    eprintln!("  --seconds   {}", QuizSettings::DEFAULT_SECONDS_PER_QUESTION);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS_PATH, QUIZ_DB_URL, QUIZ_COUNT, QUIZ_SECONDS, LOG_LEVEL, LOG_FORMAT");
}

#[derive(Debug)]
struct Args {
    questions_path: PathBuf,
    db_url: Option<String>,
    count: u32,
    seconds: u32,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut questions_path = std::env::var("QUIZ_QUESTIONS_PATH")
            .map_or_else(|_| PathBuf::from("questions.json"), PathBuf::from);
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(normalize_sqlite_url);
        let mut count = std::env::var("QUIZ_COUNT")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(QuizSettings::DEFAULT_QUESTIONS_PER_QUIZ);
        let mut seconds = std::env::var("QUIZ_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(QuizSettings::DEFAULT_SECONDS_PER_QUESTION);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    questions_path = PathBuf::from(require_value(args, "--questions")?);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                }
                "--seconds" => {
                    let value = require_value(args, "--seconds")?;
                    seconds = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeconds { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            questions_path,
            db_url,
            count,
            seconds,
        })
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

/// Tracks the session's countdown generation so the one-second ticker can be
/// realigned each time a question's countdown is re-armed.
#[derive(Debug, Default)]
struct CountdownWatch {
    last_generation: Option<u64>,
}

impl CountdownWatch {
    fn restarted(&mut self, session: Option<&QuizSession>) -> bool {
        let current = session.map(QuizSession::timer_generation);
        let changed = current.is_some() && current != self.last_generation;
        self.last_generation = current;
        changed
    }
}

/// What the event loop should do after handling one input line.
enum Flow {
    Continue,
    Quit,
}

async fn show_home(service: &QuizService) {
    let last = match service.last_result().await {
        Ok(last) => last,
        Err(err) => {
            warn!(target: "quiz", error = %err, "could not read last result");
            None
        }
    };
    println!("{}", terminal::render_home(service.pool_state(), last.as_ref()));
}

async fn show_finished(service: &QuizService, session: &mut QuizSession) {
    service.persist_result(session).await;
    if let Some(result) = session.result() {
        println!("{}", terminal::render_result(result));
    }
}

fn show_question(session: &QuizSession) {
    println!("{}", terminal::render_question(&session.snapshot()));
}

async fn handle_line(
    service: &QuizService,
    session: &mut Option<QuizSession>,
    line: &str,
) -> Result<Flow, SessionError> {
    let (phase, kind) = session.as_ref().map_or((SessionPhase::NotStarted, None), |s| {
        (s.phase(), s.current_question().map(|q| q.kind()))
    });

    let input = terminal::parse_input(line, phase, kind);
    match input {
        Input::Quit => return Ok(Flow::Quit),
        Input::Help | Input::Ignored => {
            println!("{}", terminal::help());
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    if session.is_none() {
        if input == Input::Start {
            let started = service.start_session()?;
            show_question(&started);
            *session = Some(started);
        } else {
            println!("{}", terminal::help());
        }
        return Ok(Flow::Continue);
    }
    let Some(current) = session.as_mut() else {
        return Ok(Flow::Continue);
    };

    match input {
        Input::Start => {
            current.start()?;
            show_question(current);
        }
        Input::Restart => {
            current.restart()?;
            show_question(current);
        }
        Input::Home => {
            current.back_to_home()?;
            show_home(service).await;
        }
        Input::Select(index) => {
            current.select_option(index)?;
            show_question(current);
        }
        Input::Text(text) => current.stage_text(text)?,
        Input::Next => {
            current.go_to_next()?;
            show_question(current);
        }
        Input::Previous => {
            current.go_to_previous()?;
            show_question(current);
        }
        Input::Finish => {
            let outcome = service.finish(current).await?;
            println!("{}", terminal::render_result(&outcome.result));
        }
        Input::Quit | Input::Help | Input::Ignored => {}
    }
    Ok(Flow::Continue)
}

fn handle_tick(session: &mut QuizSession) -> SessionEvent {
    let event = session.tick();
    match event {
        SessionEvent::Tick { remaining } => {
            let snapshot = session.snapshot();
            if snapshot.is_low_time || remaining % 10 == 0 {
                println!("{}", terminal::render_timer(&snapshot));
            }
        }
        SessionEvent::Advanced { .. } => {
            println!("[{}] Time is up!", terminal::format_clock(0));
            show_question(session);
        }
        SessionEvent::Finished => println!("[{}] Time is up!", terminal::format_clock(0)),
        SessionEvent::Idle => {}
    }
    event
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = QuizSettings::with_limits(parsed.count, parsed.seconds)?;
    let clock = Clock::default();
    let mut app = match &parsed.db_url {
        Some(db_url) => {
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(db_url)?;
            AppServices::new_sqlite(db_url, clock, settings).await?
        }
        None => AppServices::in_memory(clock, settings),
    };

    // A failed load leaves the pool in `Failed`; the home screen reports it.
    if let Err(err) = app.quiz_mut().load_pool_from_path(&parsed.questions_path) {
        warn!(target: "quiz", path = %parsed.questions_path.display(), error = %err, "question pool unavailable");
    }
    let service = app.quiz().clone();
    info!(target: "quiz", pool = service.pool_state().question_count(), "ready");
    show_home(&service).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut session: Option<QuizSession> = None;
    let mut watch = CountdownWatch::default();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&service, &mut session, &line).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(err) => println!("{err}"),
                }
                // A fresh countdown gets a full first second.
                if watch.restarted(session.as_ref()) {
                    ticker.reset();
                }
            }
            _ = ticker.tick() => {
                if let Some(current) = session.as_mut() {
                    if handle_tick(current) == SessionEvent::Finished {
                        show_finished(&service, current).await;
                    }
                }
                // Expiry re-arms on a tick boundary; only record the generation.
                watch.restarted(session.as_ref());
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::QuestionPool;
    use quiz_core::model::{Question, QuestionId};
    use quiz_core::time::fixed_clock;

    fn session() -> QuizSession {
        let pool = QuestionPool::new(vec![
            Question::text(QuestionId::new(1), "first", "a"),
            Question::text(QuestionId::new(2), "second", "b"),
        ]);
        QuizSession::new(pool, QuizSettings::with_limits(2, 30).unwrap(), fixed_clock())
    }

    #[test]
    fn watch_reports_each_rearmed_countdown_once() {
        let mut watch = CountdownWatch::default();
        assert!(!watch.restarted(None));

        let mut session = session();
        session.start().unwrap();
        assert!(watch.restarted(Some(&session)));
        assert!(!watch.restarted(Some(&session)));

        session.tick();
        assert!(!watch.restarted(Some(&session)));

        session.go_to_next().unwrap();
        assert!(watch.restarted(Some(&session)));

        session.go_to_previous().unwrap();
        assert!(watch.restarted(Some(&session)));
        assert!(!watch.restarted(Some(&session)));
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert!(normalize_sqlite_url("quiz.db".into()).starts_with("sqlite:///"));
    }
}
