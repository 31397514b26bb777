//! Run a child process inside a journal context.

use anyhow::{bail, Context, Result};
use console::style;
use journal_core::{
    new_global_journal_with_path, set_global_journal, Config, JournalLogHandler, JournalLogger,
    Log, Payload,
};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tracing::{warn, Level};

enum Output {
    Stdout(String),
    Stderr(String),
}

/// Run `command`, journaling each output line and the exit status inside a
/// context. Returns the child's exit code.
pub fn run(
    config: &Config,
    journal: Option<PathBuf>,
    title: Option<&str>,
    command: &[String],
) -> Result<i32> {
    let path = journal
        .or_else(|| config.journal.path.clone())
        .context("No journal file given (use --journal or set [journal] path in journal.toml)")?;
    let (program, args) = command.split_first().context("No command given")?;
    let command_line = command.join(" ");
    let title = title.unwrap_or(&command_line);

    let journal = new_global_journal_with_path(&path, &config.journal)?;
    let logger = JournalLogger::new("journal::run");
    logger.add_handler(Arc::new(
        JournalLogHandler::global().with_default_format(config.journal.default_format.clone()),
    ));

    let context = Payload::new()
        .with("command", command_line.as_str())
        .try_with("args", args)?;
    let code = logger.try_in_context(title, context, || -> Result<i32> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;

        let (tx, rx) = mpsc::channel();
        let readers = [
            child.stdout.take().map(|s| forward(s, tx.clone(), Output::Stdout)),
            child.stderr.take().map(|s| forward(s, tx.clone(), Output::Stderr)),
        ];
        drop(tx);

        let journaled = journal_output(&logger, rx);
        if journaled.is_err() {
            // Nothing left to journal the output into
            if let Err(e) = child.kill() {
                warn!("Failed to kill {}: {}", program, e);
            }
        }
        let status = child.wait()?;
        let panicked = readers
            .into_iter()
            .flatten()
            .map(|reader| reader.join().is_err())
            .filter(|&panicked| panicked)
            .count();
        journaled?;
        if panicked > 0 {
            bail!("{} output reader thread(s) panicked; the journal may be missing lines", panicked);
        }

        let code = status.code().unwrap_or(-1);
        let level = if status.success() { Level::INFO } else { Level::ERROR };
        logger.journal_or_log(
            &format!("{} exited with {}", program, status),
            level,
            Payload::new().with("exit_code", code),
        )?;
        Ok(code)
    });

    set_global_journal(None);
    journal.close()?;
    let code = code?;

    if code != 0 {
        eprintln!(
            "{} {} exited with code {}",
            style("×").red(),
            program,
            code
        );
    }
    eprintln!(
        "{} Journal written to {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    Ok(code)
}

/// Journals forwarded lines from the calling thread so they land inside
/// the open context.
fn journal_output(logger: &JournalLogger, rx: mpsc::Receiver<Output>) -> Result<()> {
    for line in rx {
        match line {
            Output::Stdout(text) => {
                println!("{}", text);
                logger.info(&text, Some(&Payload::new().with("stream", "stdout")))?;
            }
            Output::Stderr(text) => {
                eprintln!("{}", text);
                logger.warn(&text, Some(&Payload::new().with("stream", "stderr")))?;
            }
        }
    }
    Ok(())
}

fn forward<R: Read + Send + 'static>(
    source: R,
    tx: mpsc::Sender<Output>,
    wrap: fn(String) -> Output,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            let Ok(line) = line else { break };
            if tx.send(wrap(line)).is_err() {
                break;
            }
        }
    })
}
