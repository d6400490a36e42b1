use std::io::{BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_app::catalog::{Catalog, Desk, DeskReply, Notice};
use libris_kernel::settings::{Settings, TelemetrySettings};

#[derive(Parser, Debug)]
#[command(name = "libris", about = "Library lending desk", version)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every book with its status
    List,
    /// Find books whose title or author contains KEYWORD
    Search {
        #[arg(num_args = 0..)]
        keyword: Vec<String>,
    },
    /// Check a book out to a user
    Borrow { user_id: String, book_id: String },
    /// Bring a borrowed book back
    Return { user_id: String, book_id: String },
    /// Show the books a user currently holds
    Loans { user_id: String },
    /// Open an interactive desk session; loans persist until you quit
    Desk,
    /// Run the HTTP API
    Serve,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("libris: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli_args = CliArgs::parse();

    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&telemetry_for(&cli_args.command, &settings.telemetry))?;

    let catalog = if settings.catalog.seed_data {
        Catalog::seeded()
    } else {
        Catalog::empty()
    };
    let mut desk = Desk::new(catalog);

    let notice = match cli_args.command {
        Command::List => desk.view_books(),
        Command::Search { keyword } => {
            desk.fill("", keyword.join(" "));
            desk.search_books()
        }
        Command::Borrow { user_id, book_id } => {
            desk.fill(user_id, book_id);
            desk.borrow_book()
        }
        Command::Return { user_id, book_id } => {
            desk.fill(user_id, book_id);
            desk.return_book()
        }
        Command::Loans { user_id } => {
            desk.fill(user_id, "");
            desk.view_loans()
        }
        Command::Desk => {
            let stdin = std::io::stdin();
            run_session(&mut desk, stdin.lock(), std::io::stdout().lock())?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Serve => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(libris_app::bootstrap::serve(&settings))?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    Ok(report(&notice))
}

/// Only `serve` logs at the configured level; other commands already print every outcome.
fn telemetry_for(command: &Command, configured: &TelemetrySettings) -> TelemetrySettings {
    match command {
        Command::Serve => configured.clone(),
        _ => TelemetrySettings {
            log_level: "error".to_string(),
            ..configured.clone()
        },
    }
}

fn report(notice: &Notice) -> ExitCode {
    if notice.is_error() {
        eprintln!("{}", notice);
        ExitCode::FAILURE
    } else {
        println!("{}", notice);
        ExitCode::SUCCESS
    }
}

/// Read commands until `quit` or end of input. Refusals are printed and the session goes on.
fn run_session(desk: &mut Desk, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    writeln!(output, "Welcome to the Community Library System. Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line.context("failed to read desk input")?;
        match desk.run_line(&line) {
            DeskReply::Notice(notice) => writeln!(output, "{}", notice)?,
            DeskReply::Idle => {}
            DeskReply::Quit => break,
        }
    }

    tracing::debug!("desk session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(script: &str) -> String {
        let mut desk = Desk::new(Catalog::seeded());
        let mut out = Vec::new();
        run_session(&mut desk, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn session_stops_at_quit() {
        let out = session("borrow 1 3\nquit\nborrow 2 1\n");
        assert!(out.contains("Success: Book 'The Great Gatsby' borrowed successfully!"));
        assert!(!out.contains("To Kill a Mockingbird"));
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let out = session("borrow x y\nborrow 1 2\nlist\n");
        assert!(out.contains("Error: Please enter valid User ID and Book ID."));
        assert!(out.contains("Error: Book '1984' is already checked out."));
        assert!(out.contains("All Books:\n1. To Kill a Mockingbird (Available)"));
    }

    #[test]
    fn parses_subcommands() {
        let args = CliArgs::try_parse_from(["libris", "borrow", "1", "2"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Borrow { ref user_id, ref book_id } if user_id == "1" && book_id == "2"
        ));

        let args = CliArgs::try_parse_from(["libris", "search"]).unwrap();
        assert!(matches!(args.command, Command::Search { ref keyword } if keyword.is_empty()));

        let args = CliArgs::try_parse_from(["libris", "search", "great", "gatsby"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Search { ref keyword } if keyword.join(" ") == "great gatsby"
        ));

        assert!(CliArgs::try_parse_from(["libris", "borrow", "1"]).is_err());
    }

    #[test]
    fn only_serve_keeps_the_configured_log_level() {
        let configured = TelemetrySettings::default();

        assert_eq!(telemetry_for(&Command::Serve, &configured).log_level, "info");
        assert_eq!(telemetry_for(&Command::Desk, &configured).log_level, "error");
        assert_eq!(telemetry_for(&Command::List, &configured).log_level, "error");
    }
}
