mod file_store;
mod reports;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use file_store::FileStore;
use reports::{StatusReport, write_console_report, write_json_report, write_markdown_report};
use stamina_core::numbers::parse_number;
use stamina_core::{
    Clock, FixedClock, MidnightReset, StaminaEdit, StaminaSession, SystemClock,
    parse_local_instant,
};

const DATA_DIR_ENV_VAR: &str = "STAMINA_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".stamina";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Colored terminal summary
    Console,
    /// Machine-readable JSON
    Json,
    /// Markdown document
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "stamina", version)]
#[command(about = "Track daily stamina: natural recovery, bonus sources, and overflow before reset")]
struct Args {
    /// Directory holding the stamina record [env: STAMINA_DATA_DIR] [default: .stamina]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Evaluate at a fixed local instant (e.g. 2026-10-18T09:30) instead of the system clock
    #[arg(long, global = true, value_parser = parse_at)]
    at: Option<NaiveDateTime>,

    /// Output report format
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show today's projection (default)
    Status,
    /// Edit today's state, then show the projection
    Set(SetArgs),
    /// Discard today's state and start a fresh game day
    Reset,
    /// Stay running and reset at every local midnight until interrupted
    Watch,
}

#[derive(Debug, Default, clap::Args)]
struct SetArgs {
    /// Time the current stamina was read (HH:MM)
    #[arg(long)]
    time: Option<String>,
    /// Current stamina
    #[arg(long)]
    current: Option<String>,
    /// Stamina cap
    #[arg(long)]
    max: Option<String>,
    /// Activity reward claimed (+100)
    #[arg(long)]
    activity: Option<bool>,
    /// Mini-program sign-in claimed (+30)
    #[arg(long)]
    mini_program: Option<bool>,
    /// Friend gifts claimed (30 x 5)
    #[arg(long)]
    friend_gift: Option<bool>,
    /// Number of +100 purchases
    #[arg(long)]
    buy100: Option<String>,
    /// Number of +50 purchases
    #[arg(long)]
    buy50: Option<String>,
    /// Other stamina; negative for planned spending
    #[arg(long, allow_hyphen_values = true)]
    other: Option<String>,
}

impl SetArgs {
    fn edits(&self) -> Vec<StaminaEdit> {
        let mut edits = Vec::new();
        if let Some(time) = &self.time {
            edits.push(StaminaEdit::CurrentTime(time.trim().to_string()));
        }
        if let Some(raw) = &self.current {
            edits.push(StaminaEdit::CurrentStamina(parse_number(raw)));
        }
        if let Some(raw) = &self.max {
            edits.push(StaminaEdit::MaxStamina(parse_number(raw)));
        }
        if let Some(claimed) = self.activity {
            edits.push(StaminaEdit::ActivityReward(claimed));
        }
        if let Some(claimed) = self.mini_program {
            edits.push(StaminaEdit::MiniProgramSignIn(claimed));
        }
        if let Some(claimed) = self.friend_gift {
            edits.push(StaminaEdit::FriendGift(claimed));
        }
        if let Some(raw) = &self.buy100 {
            edits.push(StaminaEdit::Buy100Times(parse_number(raw)));
        }
        if let Some(raw) = &self.buy50 {
            edits.push(StaminaEdit::Buy50Times(parse_number(raw)));
        }
        if let Some(raw) = &self.other {
            edits.push(StaminaEdit::OtherStamina(parse_number(raw)));
        }
        edits
    }
}

fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    parse_local_instant(raw).ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got {raw:?}"))
}

/// Wall clock, or a frozen instant when `--at` is given.
#[derive(Debug, Clone, Copy)]
enum HostClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for HostClock {
    fn now(&self) -> NaiveDateTime {
        match self {
            Self::System(clock) => clock.now(),
            Self::Fixed(clock) => clock.now(),
        }
    }
}

type Session = StaminaSession<FileStore, HostClock>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let data_dir = resolve_data_dir(&args);
    let clock = args
        .at
        .map_or(HostClock::System(SystemClock), |at| {
            HostClock::Fixed(FixedClock(at))
        });
    log::debug!("using stamina data dir {}", data_dir.display());

    let mut session = StaminaSession::open(FileStore::new(&data_dir), clock)
        .with_context(|| format!("opening stamina record in {}", data_dir.display()))?;

    match args.command.as_ref().unwrap_or(&Command::Status) {
        Command::Status => {}
        Command::Set(set) => {
            let edits = set.edits();
            if edits.is_empty() {
                log::warn!("set called without any field; showing current status");
            }
            session.apply_all(edits).context("saving stamina edits")?;
        }
        Command::Reset => {
            session
                .reset_for_new_day()
                .context("writing fresh stamina day")?;
        }
        Command::Watch => return watch(session, args.report).await,
    }

    let mut output_target = OutputTarget::new(args.output.clone())?;
    render(output_target.writer(), args.report, &status_report(&session))?;
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn resolve_data_dir(args: &Args) -> PathBuf {
    args.data_dir
        .clone()
        .or_else(|| std::env::var_os(DATA_DIR_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn status_report(session: &Session) -> StatusReport {
    StatusReport {
        date_key: session.date_key().unwrap_or_default().to_string(),
        outcome: session.outcome().clone(),
        state: session.state().clone(),
        projection: session.projection(),
    }
}

fn render(out: &mut dyn Write, format: ReportFormat, report: &StatusReport) -> Result<()> {
    match format {
        ReportFormat::Console => write_console_report(out, report),
        ReportFormat::Json => write_json_report(out, report),
        ReportFormat::Markdown => write_markdown_report(out, report),
    }
}

async fn watch(session: Session, format: ReportFormat) -> Result<()> {
    render(&mut stdout(), format, &status_report(&session))?;
    let session = Arc::new(Mutex::new(session));

    let timer = MidnightReset::spawn(Arc::clone(&session), move |session: &Session| {
        println!(
            "{}",
            format!("🌙 New game day at {}", session.state().current_time).bright_blue()
        );
        if let Err(err) = render(&mut stdout(), format, &status_report(session)) {
            log::warn!("failed to render status after reset: {err:#}");
        }
    });

    println!("{}", "Watching for the daily reset; press Ctrl-C to stop.".dimmed());
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    timer.cancel();
    Ok(())
}

struct OutputTarget {
    writer: Box<dyn Write>,
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        let writer: Box<dyn Write> = match path {
            Some(path) => {
                colored::control::set_override(false);
                let file = File::create(&path)
                    .with_context(|| format!("creating report file {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(stdout()),
        };
        Ok(Self { writer })
    }

    fn writer(&mut self) -> &mut dyn Write {
        self.writer.as_mut()
    }

    fn flush_inner(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
