//! The `tutorkit run` command: an interactive terminal session.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use tutorkit_core::bank::parse_bank;
use tutorkit_core::counters::SessionCounters;
use tutorkit_core::logging::JsonlSink;
use tutorkit_core::model::{AssessmentResult, Role};
use tutorkit_core::orchestrator::{OrchestratorConfig, SessionOrchestrator};
use tutorkit_core::Error;
use tutorkit_providers::config::{create_capabilities, load_config_from};
use tutorkit_report::SessionReport;

pub async fn execute(
    config_path: Option<PathBuf>,
    bank_override: Option<PathBuf>,
    sample_size_override: Option<usize>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(bank) = bank_override {
        config.bank_path = bank;
    }
    if let Some(k) = sample_size_override {
        anyhow::ensure!(k >= 1, "sample size must be at least 1");
        config.sample_size = k;
    }

    let bank = parse_bank(&config.bank_path)?;
    let capabilities = create_capabilities(&config)?;
    let sink = Arc::new(JsonlSink::new(&config.log_path));
    let counters = Arc::new(SessionCounters::new());
    let actor_id = config.actor_id.clone();

    let mut orchestrator = SessionOrchestrator::new(
        bank,
        capabilities.judge,
        capabilities.tutor,
        sink,
        counters,
        OrchestratorConfig {
            sample_size: config.sample_size,
            parallelism: config.parallelism,
            actor_id: actor_id.clone(),
        },
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("tutorkit — controllable solution-hint tutoring");
    eprintln!("Press Enter to begin a quiz, or type 'quit'.");
    match lines.next_line().await? {
        None => return Ok(()),
        Some(line) if line.trim() == "quit" => return Ok(()),
        Some(_) => {}
    }

    orchestrator.begin()?;
    quiz_loop(&mut orchestrator, &mut lines).await?;

    while orchestrator.phase() == "results" {
        if !results_loop(&mut orchestrator, &mut lines, &actor_id).await? {
            break;
        }
        // results_loop returned true: a new session was requested.
        quiz_loop(&mut orchestrator, &mut lines).await?;
    }

    Ok(())
}

/// Drive the quiz phase until submission succeeds or input ends.
async fn quiz_loop(
    orchestrator: &mut SessionOrchestrator,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    eprintln!();
    eprintln!("Answer each question. Commands: :next, :prev, :submit, :quit");

    loop {
        {
            let quiz = orchestrator.quiz()?;
            let position = quiz.cursor();
            let question = quiz.current();
            eprintln!();
            eprintln!("[{}/{}] {}", position + 1, quiz.len(), question.content);
            let draft = quiz.draft(position).unwrap_or_default();
            if !draft.trim().is_empty() {
                eprintln!("  current draft: {draft}");
            }
        }
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        match line.trim() {
            ":quit" => std::process::exit(0),
            ":next" => orchestrator.advance()?,
            ":prev" => orchestrator.retreat()?,
            ":submit" => match orchestrator.submit().await {
                Ok(results) => {
                    print_results(results);
                    return Ok(());
                }
                Err(Error::IncompleteSubmission { missing }) => {
                    eprintln!("Cannot submit yet — missing answers for questions {missing:?}");
                }
                Err(e) => return Err(e.into()),
            },
            "" => {}
            answer => {
                let position = orchestrator.quiz()?.cursor();
                orchestrator.set_draft(position, answer)?;
                orchestrator.advance()?;
            }
        }
    }
}

/// Drive the results phase. Returns `true` when a new session was started.
async fn results_loop(
    orchestrator: &mut SessionOrchestrator,
    lines: &mut Lines<BufReader<Stdin>>,
    actor_id: &str,
) -> Result<bool> {
    eprintln!();
    eprintln!("Commands: review <question-id>, hint <your question>, report <path>, new, quit");

    loop {
        eprint!("results> ");
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        let line = line.trim();

        if line == "quit" {
            return Ok(false);
        } else if line == "new" {
            orchestrator.new_session()?;
            return Ok(true);
        } else if let Some(id_str) = line.strip_prefix("review ") {
            let Ok(question_id) = id_str.trim().parse::<u32>() else {
                eprintln!("usage: review <question-id>");
                continue;
            };
            match orchestrator.select_result(question_id) {
                Ok(thread) => {
                    for turn in thread.turns() {
                        let who = match turn.role {
                            Role::User => "you",
                            Role::Assistant => "tutor",
                        };
                        eprintln!("  {who}: {}", turn.text);
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
        } else if let Some(request) = line.strip_prefix("hint ") {
            match orchestrator
                .request_hint(request.trim(), |fragment| {
                    print!("{fragment}");
                    let _ = std::io::stdout().flush();
                })
                .await
            {
                Ok(_) => println!(),
                Err(e) if e.is_retryable() => eprintln!("\nhint failed (try again): {e}"),
                Err(e) => eprintln!("\n{e}"),
            }
        } else if let Some(path) = line.strip_prefix("report ") {
            let report = SessionReport::from_counters(actor_id, orchestrator.counters());
            match report.save(std::path::Path::new(path.trim())) {
                Ok(()) => eprintln!("report written to {}", path.trim()),
                Err(e) => eprintln!("{e:#}"),
            }
        } else if !line.is_empty() {
            eprintln!("unknown command: {line}");
        }
    }
}

fn print_results(results: &[AssessmentResult]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Your Answer", "Verdict"]);
    for result in results {
        table.add_row(vec![
            Cell::new(format!("#{} {}", result.question.id, result.question.content)),
            Cell::new(&result.answer),
            Cell::new(if result.is_correct { "correct" } else { "incorrect" }),
        ]);
    }
    eprintln!("\n{table}");
}
