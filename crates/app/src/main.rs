use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use services::config::{ENV_FETCH_TIMEOUT_SECS, ENV_SOURCE_URL};
use services::{DrillError, DrillService, DrillSnapshot, SourceConfig, VocabularySource};
use vocab_core::{AnswerEvaluator, DrillPhase, SessionError, SessionId};

/// Exit status when no usable vocabulary could be loaded.
const EXIT_NO_VOCABULARY: i32 = 1;
/// Exit status for argument and runtime errors.
const EXIT_FAILURE: i32 = 2;

struct Args {
    source: SourceConfig,
    threshold: Option<f32>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingSource,
    InvalidTimeout { raw: String },
    InvalidThreshold { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingSource => {
                write!(f, "no vocabulary source given (use --source or {ENV_SOURCE_URL})")
            }
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
            ArgsError::InvalidThreshold { raw } => {
                write!(f, "invalid --threshold value: {raw} (expected 0.0 to 1.0)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

/// Ingestion produced nothing to drill.
#[derive(Debug)]
struct NoVocabulary;

impl fmt::Display for NoVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No vocabulary found, or the file has no usable rows.")
    }
}

impl std::error::Error for NoVocabulary {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--source <url|path>] [--timeout <secs>] [--threshold <ratio>]");
    eprintln!();
    eprintln!("While drilling:");
    eprintln!("  type a translation and press enter to answer");
    eprintln!("  press enter (or type `next`) to move on after feedback");
    eprintln!("  :restart   reload the vocabulary and start over");
    eprintln!("  :quit      leave");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {ENV_SOURCE_URL}, {ENV_FETCH_TIMEOUT_SECS}, VOCAB_ENCODINGS,");
    eprintln!("  VOCAB_SOURCE_COLUMNS, VOCAB_TARGET_COLUMNS, RUST_LOG");
}

/// Environment first, then flags on top.
fn parse_args(args: &mut impl Iterator<Item = String>) -> Result<Args, ArgsError> {
    let mut config = SourceConfig::from_env();
    let mut timeout = None;
    let mut threshold = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--source" => {
                let value = require_value(args, "--source")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::MissingSource);
                }
                let previous = config.take();
                config = Some(match previous {
                    Some(existing) => SourceConfig {
                        locator: value.trim().to_string(),
                        ..existing
                    },
                    None => SourceConfig::new(value.trim()),
                });
            }
            "--timeout" => {
                let value = require_value(args, "--timeout")?;
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
                timeout = Some(Duration::from_secs(secs));
            }
            "--threshold" => {
                let value = require_value(args, "--threshold")?;
                let ratio = value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|ratio| (0.0..=1.0).contains(ratio))
                    .ok_or_else(|| ArgsError::InvalidThreshold { raw: value.clone() })?;
                threshold = Some(ratio);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    let config = config.ok_or(ArgsError::MissingSource)?;
    let source = match timeout {
        Some(timeout) => config.with_timeout(timeout),
        None => config,
    };
    Ok(Args { source, threshold })
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn render(out: &mut impl Write, snapshot: &DrillSnapshot) -> io::Result<()> {
    match snapshot.phase {
        DrillPhase::Uninitialized => writeln!(out, "Press enter to start.")?,
        DrillPhase::Active => {
            if let Some(term) = &snapshot.current_term {
                writeln!(out)?;
                writeln!(out, "Translate: {term}")?;
            }
            write!(out, "> ")?;
        }
        DrillPhase::Feedback => {
            if let Some(message) = snapshot.feedback_message() {
                writeln!(out, "{message}")?;
            }
            if let Some(progress) = snapshot.progress_label() {
                writeln!(out, "Progress: {progress}")?;
            }
            writeln!(out, "Correct so far: {}", snapshot.correct_count)?;
            write!(out, "[enter] next word ")?;
        }
        DrillPhase::Complete => {
            writeln!(out)?;
            writeln!(out, "You have gone through all the words!")?;
            writeln!(out, "Total correct: {}", snapshot.score_label())?;
            if let Some(summary) = &snapshot.summary {
                writeln!(out, "Accuracy: {:.0}%", summary.accuracy() * 100.0)?;
            }
            writeln!(out, "Type :restart to start over or :quit to leave.")?;
        }
    }
    out.flush()
}

//
// ─── DRILL LOOP ────────────────────────────────────────────────────────────────
//

async fn restart(
    service: &DrillService,
    source: &VocabularySource,
    id: SessionId,
) -> Result<DrillSnapshot, DrillError> {
    let load = source.load().await;
    if load.is_available() {
        service.replace_vocabulary(Arc::new(load.into_vocabulary()))?;
    } else {
        tracing::warn!("keeping the previous vocabulary");
    }
    service.restart(id)?;
    service.start(id)
}

async fn drill(
    service: &DrillService,
    source: &VocabularySource,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = service.open_session()?;
    let mut snapshot = service.start(id)?;
    let mut out = io::stdout().lock();
    render(&mut out, &snapshot)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = line.trim();

        snapshot = match command {
            ":quit" | ":q" => break,
            ":restart" => restart(service, source, id).await?,
            _ => match snapshot.phase {
                DrillPhase::Active => match service.submit_answer(id, &line) {
                    Ok(next) => next,
                    Err(DrillError::Session(SessionError::EmptyAnswer)) => {
                        writeln!(out, "Type an answer before submitting!")?;
                        snapshot
                    }
                    Err(err) => return Err(err.into()),
                },
                DrillPhase::Feedback if command.is_empty() || command == "next" => {
                    service.advance(id)?
                }
                DrillPhase::Feedback => {
                    writeln!(out, "Press enter to continue.")?;
                    snapshot
                }
                DrillPhase::Uninitialized => service.start(id)?,
                DrillPhase::Complete => snapshot,
            },
        };
        render(&mut out, &snapshot)?;
    }

    service.close_session(id)?;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let parsed = parse_args(&mut args).inspect_err(|_| print_usage())?;

    let source = VocabularySource::from_config(parsed.source);
    let load = source.load().await;
    if !load.is_available() {
        if let Some(err) = load.failure() {
            eprintln!("Loading the vocabulary failed: {err}");
        }
        return Err(NoVocabulary.into());
    }

    let mut service = DrillService::new(Arc::new(load.into_vocabulary()));
    if let Some(threshold) = parsed.threshold {
        service = service.with_evaluator(AnswerEvaluator::new().with_threshold(threshold));
    }
    drill(&service, &source).await
}

fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    if err.is::<NoVocabulary>() {
        EXIT_NO_VOCABULARY
    } else {
        EXIT_FAILURE
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("services=info,app=info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(exit_code(err.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::time::fixed_clock;
    use vocab_core::{QuizSession, Vocabulary};

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn source_and_timeout_flags_are_parsed() {
        let parsed = parse_args(&mut args(&[
            "--source",
            " words.csv ",
            "--timeout",
            "3",
            "--threshold",
            "0.85",
        ]))
        .unwrap();
        assert_eq!(parsed.source.locator, "words.csv");
        assert_eq!(parsed.source.timeout, Duration::from_secs(3));
        assert_eq!(parsed.threshold, Some(0.85));
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(matches!(
            parse_args(&mut args(&["--source"])),
            Err(ArgsError::MissingValue { flag: "--source" })
        ));
        assert!(matches!(
            parse_args(&mut args(&["--source", "a.csv", "--timeout", "soon"])),
            Err(ArgsError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            parse_args(&mut args(&["--source", "a.csv", "--threshold", "1.5"])),
            Err(ArgsError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            parse_args(&mut args(&["--verbose"])),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn missing_vocabulary_has_its_own_exit_code() {
        let missing: Box<dyn std::error::Error> = NoVocabulary.into();
        assert_eq!(exit_code(missing.as_ref()), EXIT_NO_VOCABULARY);

        let bad_args: Box<dyn std::error::Error> = ArgsError::MissingSource.into();
        assert_eq!(exit_code(bad_args.as_ref()), EXIT_FAILURE);
    }

    #[test]
    fn feedback_render_shows_verdict_and_progress() {
        let vocab: Vocabulary = [("kissa", "cat")].into_iter().collect();
        let mut session = QuizSession::new().with_clock(fixed_clock());
        session.start(&vocab).unwrap();
        session.submit_answer("dog").unwrap();
        let snapshot = DrillSnapshot::from_session(SessionId::new(), &session);

        let mut out = Vec::new();
        render(&mut out, &snapshot).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Wrong. The correct answer is: cat"));
        assert!(text.contains("Progress: 1 / 1"));
        assert!(text.contains("Correct so far: 0"));
    }
}
