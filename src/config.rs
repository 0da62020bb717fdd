use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Environment variable naming the task store file.
pub const STORE_ENV: &str = "TASKCAL_STORE";
/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TASKCAL_LOG";

const STORE_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub store_path: PathBuf,
	pub color: bool,
}

impl Config {
	/// Resolve settings from command line values, falling back to the
	/// platform data directory for the store. Colour is only on when stdout
	/// is a terminal.
	pub fn resolve(store: Option<PathBuf>, no_color: bool) -> Result<Self> {
		Self::resolve_for(store, no_color, std::io::stdout().is_terminal())
	}

	pub fn resolve_for(store: Option<PathBuf>, no_color: bool, stdout_tty: bool) -> Result<Self> {
		let store_path = match store {
			Some(p) => p,
			None => default_store_path()?,
		};
		let color = stdout_tty && !no_color && env::var_os("NO_COLOR").map_or(true, |v| v.is_empty());
		Ok(Self { store_path, color })
	}
}

fn data_dir() -> Result<PathBuf> {
	let proj = ProjectDirs::from("dev", "local", "taskcal").context("cannot resolve project dirs")?;
	Ok(proj.data_dir().to_path_buf())
}

pub fn default_store_path() -> Result<PathBuf> {
	Ok(data_dir()?.join(STORE_FILE))
}
