mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppEvent, AppModel};
use crate::cli::{BrowseArgs, CliInvocation};
use crate::domain::sort_by_start;
use crate::infra::{extract_records, fetch_page, make_agent, open_url, schedule_sources};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use time::{OffsetDateTime, PrimitiveDateTime};

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), app::AppError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Browse(browse) => run_browser(browse),
    }
}

fn print_help() {
    let text = format!(
        "{name} — browse IVS observing-session schedules in the terminal\n\nUSAGE:\n  {name} [--year N] [--scope SCOPE] [--station CODES] [--session CODE]\n  {name} --help | --version\n\nFLAGS:\n  --year N         Schedule year (default: current year)\n  --scope SCOPE    master|intensive|both (default: both)\n  --station CODES  Start with the filter `stations: CODES`\n  --session CODE   Start with the filter `code: CODE`\n\nFILTERS:\n  Clauses separated by ';' must all match.\n  field: value matches one column (type, code, start, doy, dur, db, ops,\n  correlator, status, analysis). stations: Ns&Nn needs both stations,\n  stations: Ns|Nn needs either; stations_removed: and stations_all: check\n  the removed / combined lists. Station codes are case-sensitive,\n  everything else is matched case-insensitively.\n\nKEYS:\n  Arrows/PgUp/PgDn/Home/End move, t jumps to now, Enter opens the session\n  page, / filters, F clears, r toggles removed stations, ? shows help,\n  q quits.\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn utc_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

fn run_browser(args: BrowseArgs) -> Result<(), app::AppError> {
    let now = utc_now();
    let year = args.year.unwrap_or(now.year());

    let agent = make_agent();
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for source in schedule_sources(args.scope, year) {
        match fetch_page(&agent, &source.url) {
            Ok(bytes) => {
                let html = String::from_utf8_lossy(&bytes);
                records.extend(extract_records(&html, source.intensive));
            }
            Err(error) => {
                let message = error.to_string();
                let mut err = io::stderr().lock();
                let _ = writeln!(err, "{message}");
                warnings.push(message);
            }
        }
    }
    sort_by_start(&mut records);

    let mut model = AppModel::new(records, now);
    if !warnings.is_empty() {
        model.notice = Some(warnings.join("; "));
    }
    if let Some(query) = cli::initial_filter(&args) {
        model.apply_filter(&query, now);
    }

    let mut terminal = setup_terminal()?;
    if let Ok((width, height)) = crossterm::terminal::size() {
        model.terminal_size = (width, height);
    }
    let result = run_loop(&mut terminal, model);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut model: AppModel,
) -> Result<(), app::AppError> {
    loop {
        terminal.draw(|frame| ui::render(frame, &model))?;

        let app_event = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
            Event::Resize(width, height) => AppEvent::Resize(width, height),
            _ => continue,
        };

        let (next, command) = app::update(model, app_event, utc_now());
        model = next;
        match command {
            AppCommand::None => {}
            AppCommand::Quit => return Ok(()),
            AppCommand::OpenUrl(url) => {
                if let Err(error) = open_url(&url) {
                    model.notice = Some(format!("Could not open {url}: {error}"));
                }
            }
        }
    }
}
