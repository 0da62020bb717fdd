use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use taskcal::commands::{self, TerminalPrompt};
use taskcal::config::{LOG_ENV, STORE_ENV};
use taskcal::dates::parse_or_today;
use taskcal::{Config, TaskStore};

#[derive(Parser)]
#[command(
	name = "taskcal",
	version,
	about = "Calendar task list",
	long_about = "Attach short tasks to calendar dates and keep them in a JSON file.\n\nFeatures:\n- Add/list/delete tasks per date, or clear a whole date\n- Month calendar with markers on days that have tasks\n- Export a date range to a plain text file",
	after_help = "Examples:\n  taskcal add \"Buy milk\"\n  taskcal add -d 2024-01-03 Call Bob\n  taskcal list -d 2024-01-03\n  taskcal delete -d 2024-01-03 Call Bob\n  taskcal delete --at 2\n  taskcal clear -d 2024-01-03\n  taskcal cal\n  taskcal export --from 2024-01-01 --to 2024-01-31 -o january.txt"
)]
struct Cli {
	/// Task store file (default: tasks.json in the user data dir)
	#[arg(long = "store", global = true, env = STORE_ENV)]
	store: Option<PathBuf>,
	/// Disable coloured calendar markers
	#[arg(long = "no-color", global = true)]
	no_color: bool,
	#[command(subcommand)]
	action: Action,
}

#[derive(Subcommand)]
enum Action {
	/// Add a task to a date (default today)
	Add {
		/// Task text, trimmed; at most 30 characters are kept
		text: Vec<String>,
		/// Date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
	},
	/// List tasks for a date (default today)
	List {
		/// Date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
	},
	/// Delete one task from a date, by text or by position
	Delete {
		/// Exact task text; the first match is removed
		#[arg(required_unless_present = "at", conflicts_with = "at")]
		text: Vec<String>,
		/// 1-based position as shown by `list`
		#[arg(long = "at")]
		at: Option<usize>,
		/// Date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
	},
	/// Delete all tasks of a date, after confirmation
	Clear {
		/// Date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
		/// Do not ask for confirmation
		#[arg(short = 'y', long = "yes")]
		yes: bool,
	},
	/// Show a month calendar with markers and the tasks of the selected date
	Cal {
		/// Selected date; its month is shown (default today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
	},
	/// Export tasks of a date range to a text file
	Export {
		/// First date YYYY-MM-DD (prompted for when missing)
		#[arg(long = "from")]
		from: Option<String>,
		/// Last date YYYY-MM-DD, inclusive (prompted for when missing)
		#[arg(long = "to")]
		to: Option<String>,
		/// Destination file (prompted for when missing)
		#[arg(short = 'o', long = "output")]
		output: Option<PathBuf>,
	},
	/// List every stored date with its task count
	Summary,
}

fn main() -> Result<()> {
	init_logging()?;
	let cli = Cli::parse();
	let cfg = Config::resolve(cli.store, cli.no_color)?;
	debug!(store = %cfg.store_path.display(), color = cfg.color, "resolved config");
	colored::control::set_override(cfg.color);
	let mut store = TaskStore::load(&cfg.store_path)?;
	match cli.action {
		Action::Add { text, date } => {
			let date = parse_or_today(date.as_deref())?;
			commands::add_task(&mut store, date, &text.join(" "))?
		}
		Action::List { date } => {
			let date = parse_or_today(date.as_deref())?;
			commands::list_tasks(&store, date)
		}
		Action::Delete { text, at, date } => {
			let date = parse_or_today(date.as_deref())?;
			match at {
				Some(pos) => commands::delete_task_at(&mut store, date, pos)?,
				None => commands::delete_task(&mut store, date, &text.join(" "))?,
			}
		}
		Action::Clear { date, yes } => {
			let date = parse_or_today(date.as_deref())?;
			commands::clear_tasks(&mut store, date, yes, &TerminalPrompt)?
		}
		Action::Cal { date } => {
			let date = parse_or_today(date.as_deref())?;
			commands::month_view(&store, date, cfg.color)?
		}
		Action::Export { from, to, output } => {
			commands::export(&store, from.as_deref(), to.as_deref(), output, &TerminalPrompt)?;
		}
		Action::Summary => commands::summary(&store),
	}
	Ok(())
}

fn init_logging() -> Result<()> {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.or_else(|_| EnvFilter::try_new("warn"))
		.map_err(|e| anyhow!("invalid {} filter: {}", LOG_ENV, e))?;
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_ansi(std::io::stderr().is_terminal())
		.try_init()
		.map_err(|e| anyhow!("install log subscriber: {}", e))
}
