use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use dialoguer::{Confirm, Input};

use crate::calendar::{render_month, CellPainter, HighlightPainter, PlainPainter};
use crate::dates::{date_key, parse_date, today};
use crate::export::export_to_file;
use crate::store::TaskStore;

/// Longest task text accepted from the command line, in characters.
pub const MAX_TASK_LEN: usize = 30;

/// Interactive questions asked by the commands. `None` means the user
/// backed out (Esc, Ctrl-C in the prompt).
pub trait Prompt {
	fn confirm(&self, message: &str, default: bool) -> Result<Option<bool>>;
	fn date(&self, message: &str) -> Result<Option<NaiveDate>>;
	fn text(&self, message: &str) -> Result<Option<String>>;
}

/// `dialoguer` prompts on the controlling terminal.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
	fn confirm(&self, message: &str, default: bool) -> Result<Option<bool>> {
		Ok(Confirm::new().with_prompt(message).default(default).interact_opt()?)
	}

	fn date(&self, message: &str) -> Result<Option<NaiveDate>> {
		let input: String = Input::new()
			.with_prompt(message)
			.default(date_key(today()))
			.validate_with(|s: &String| parse_date(s).map(|_| ()).map_err(|e| e.to_string()))
			.interact_text()?;
		Ok(Some(parse_date(&input)?))
	}

	fn text(&self, message: &str) -> Result<Option<String>> {
		let input: String = Input::new().with_prompt(message).allow_empty(true).interact_text()?;
		Ok(Some(input))
	}
}

/// Text as typed into the task input: surrounding whitespace dropped, at most
/// `MAX_TASK_LEN` characters kept.
pub fn task_input(raw: &str) -> String {
	raw.trim().chars().take(MAX_TASK_LEN).collect()
}

pub fn add_task(store: &mut TaskStore, date: NaiveDate, raw: &str) -> Result<()> {
	if store.add_task(date, &task_input(raw))? {
		println!("Added to {}", date);
	}
	Ok(())
}

pub fn list_tasks(store: &TaskStore, date: NaiveDate) {
	let tasks = store.list_tasks(date);
	if tasks.is_empty() {
		println!("No tasks for {}", date);
		return;
	}
	for (i, t) in tasks.iter().enumerate() {
		println!("{:>2}. {}", i + 1, t);
	}
}

pub fn delete_task(store: &mut TaskStore, date: NaiveDate, raw: &str) -> Result<()> {
	let text = raw.trim();
	if store.delete_task(date, text)? {
		println!("Deleted from {}: {}", date, text);
	}
	Ok(())
}

pub fn delete_task_at(store: &mut TaskStore, date: NaiveDate, position: usize) -> Result<()> {
	if position == 0 {
		bail!("positions start at 1");
	}
	if let Some(removed) = store.delete_task_at(date, position)? {
		println!("Deleted from {}: {}", date, removed);
	}
	Ok(())
}

/// Empty a stored date after confirmation (skipped with `yes`). Dates that
/// are not stored are left alone without asking.
pub fn clear_tasks(store: &mut TaskStore, date: NaiveDate, yes: bool, prompt: &dyn Prompt) -> Result<()> {
	if !store.tasks().contains_key(&date_key(date)) {
		return Ok(());
	}
	if !yes {
		let confirmed = prompt.confirm(&format!("Delete all tasks for {}?", date), false)?.unwrap_or(false);
		if !confirmed {
			return Ok(());
		}
	}
	let dropped = store.clear_tasks(date)?;
	if dropped > 0 {
		println!("Cleared {} task(s) from {}", dropped, date);
	}
	Ok(())
}

pub fn month_view(store: &TaskStore, selected: NaiveDate, color: bool) -> Result<()> {
	let painter: Box<dyn CellPainter> = if color {
		Box::new(HighlightPainter { selected })
	} else {
		Box::new(PlainPainter { selected: Some(selected) })
	};
	print!("{}", render_month(selected, store, painter.as_ref())?);
	if !color {
		println!("legend: * has tasks, < selected");
	}
	println!();
	println!("# {}", selected);
	list_tasks(store, selected);
	Ok(())
}

/// Export a date range, asking for whatever was not given on the command
/// line. Returns the destination when a file was written.
pub fn export(
	store: &TaskStore,
	from: Option<&str>,
	to: Option<&str>,
	output: Option<PathBuf>,
	prompt: &dyn Prompt,
) -> Result<Option<PathBuf>> {
	let range = match (from, to) {
		(Some(f), Some(t)) => Some((parse_date(f)?, parse_date(t)?)),
		(f, t) => ask_range(f, t, prompt)?,
	};
	let Some((start, end)) = range else { return Ok(None) };
	let path = match output {
		Some(p) => p,
		None => {
			let input = prompt.text("Export to file")?.unwrap_or_default();
			let input = input.trim();
			if input.is_empty() {
				return Ok(None);
			}
			PathBuf::from(input)
		}
	};
	let blocks = export_to_file(store, start, end, &path)?;
	notify_exported(&path, blocks);
	Ok(Some(path))
}

/// Ask for whichever end of the range is missing, then for confirmation.
fn ask_range(from: Option<&str>, to: Option<&str>, prompt: &dyn Prompt) -> Result<Option<(NaiveDate, NaiveDate)>> {
	let start = match from {
		Some(s) => parse_date(s)?,
		None => match prompt.date("Start date")? {
			Some(d) => d,
			None => return Ok(None),
		},
	};
	let end = match to {
		Some(s) => parse_date(s)?,
		None => match prompt.date("End date")? {
			Some(d) => d,
			None => return Ok(None),
		},
	};
	let ok = prompt.confirm(&format!("Export tasks from {} to {}?", start, end), true)?.unwrap_or(false);
	Ok(ok.then_some((start, end)))
}

fn notify_exported(path: &Path, blocks: usize) {
	let title = "Export finished";
	let msg = format!("Tasks were exported to {} ({} date(s))", path.display(), blocks);
	println!("{}: {}", title, msg);
	if which::which("notify-send").is_ok() {
		let _ = std::process::Command::new("notify-send").arg(title).arg(&msg).status();
	}
}

pub fn summary(store: &TaskStore) {
	let mut any = false;
	for (date, count) in store.dates() {
		println!("{} {:>3}", date, count);
		any = true;
	}
	if !any {
		println!("No tasks stored in {}", store.path().display());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	/// Fixed answers; counts how often each kind of question was asked.
	#[derive(Default)]
	struct Scripted {
		confirm: Option<bool>,
		date: Option<NaiveDate>,
		text: Option<String>,
		asked: Cell<usize>,
	}

	impl Prompt for Scripted {
		fn confirm(&self, _: &str, _: bool) -> Result<Option<bool>> {
			self.asked.set(self.asked.get() + 1);
			Ok(self.confirm)
		}
		fn date(&self, _: &str) -> Result<Option<NaiveDate>> {
			self.asked.set(self.asked.get() + 1);
			Ok(self.date)
		}
		fn text(&self, _: &str) -> Result<Option<String>> {
			self.asked.set(self.asked.get() + 1);
			Ok(self.text.clone())
		}
	}

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
	}

	fn seeded() -> (tempfile::TempDir, TaskStore) {
		let dir = tempfile::tempdir().unwrap();
		let mut store = TaskStore::new(dir.path().join("tasks.json"));
		store.add_task(day(1), "Buy milk").unwrap();
		store.add_task(day(3), "Call Bob").unwrap();
		(dir, store)
	}

	#[test]
	fn task_input_trims_and_clips() {
		assert_eq!(task_input("  x "), "x");
		assert_eq!(task_input("   "), "");
		let long = "Pick up the dry cleaning before six pm";
		assert_eq!(task_input(long), "Pick up the dry cleaning befor");
		assert_eq!(task_input(&"é".repeat(40)).chars().count(), MAX_TASK_LEN);
	}

	#[test]
	fn added_text_can_be_deleted_with_same_spacing() {
		let (_dir, mut store) = seeded();
		add_task(&mut store, day(2), " x ").unwrap();
		assert_eq!(store.list_tasks(day(2)), ["x"]);
		delete_task(&mut store, day(2), " x").unwrap();
		assert!(store.list_tasks(day(2)).is_empty());
	}

	#[test]
	fn blank_input_adds_nothing() {
		let (_dir, mut store) = seeded();
		add_task(&mut store, day(2), "   ").unwrap();
		assert!(store.tasks().get("2024-01-02").is_none());
	}

	#[test]
	fn declined_clear_keeps_tasks() {
		let (_dir, mut store) = seeded();
		let prompt = Scripted { confirm: Some(false), ..Default::default() };
		clear_tasks(&mut store, day(1), false, &prompt).unwrap();
		assert_eq!(prompt.asked.get(), 1);
		assert_eq!(store.list_tasks(day(1)), ["Buy milk"]);
		assert_eq!(TaskStore::load(store.path()).unwrap().list_tasks(day(1)), ["Buy milk"]);
	}

	#[test]
	fn cancelled_clear_keeps_tasks() {
		let (_dir, mut store) = seeded();
		let prompt = Scripted { confirm: None, ..Default::default() };
		clear_tasks(&mut store, day(1), false, &prompt).unwrap();
		assert_eq!(store.list_tasks(day(1)), ["Buy milk"]);
	}

	#[test]
	fn confirmed_or_forced_clear_empties_date() {
		let (_dir, mut store) = seeded();
		let prompt = Scripted { confirm: Some(true), ..Default::default() };
		clear_tasks(&mut store, day(1), false, &prompt).unwrap();
		assert!(store.list_tasks(day(1)).is_empty());

		let never = Scripted::default();
		clear_tasks(&mut store, day(3), true, &never).unwrap();
		assert_eq!(never.asked.get(), 0);
		assert!(store.list_tasks(day(3)).is_empty());
	}

	#[test]
	fn clear_of_unknown_date_does_not_ask() {
		let (_dir, mut store) = seeded();
		let prompt = Scripted { confirm: Some(true), ..Default::default() };
		clear_tasks(&mut store, day(20), false, &prompt).unwrap();
		assert_eq!(prompt.asked.get(), 0);
		assert!(store.tasks().get("2024-01-20").is_none());
	}

	#[test]
	fn cancelled_range_writes_nothing() {
		let (dir, store) = seeded();
		let out = dir.path().join("export.txt");
		let prompt = Scripted { date: None, ..Default::default() };
		let written = export(&store, None, None, Some(out.clone()), &prompt).unwrap();
		assert_eq!(written, None);
		assert!(!out.exists());
	}

	#[test]
	fn declined_range_writes_nothing() {
		let (dir, store) = seeded();
		let out = dir.path().join("export.txt");
		let prompt = Scripted { date: Some(day(1)), confirm: Some(false), ..Default::default() };
		let written = export(&store, None, Some("2024-01-03"), Some(out.clone()), &prompt).unwrap();
		assert_eq!(written, None);
		assert_eq!(prompt.asked.get(), 2);
		assert!(!out.exists());
	}

	#[test]
	fn empty_or_cancelled_destination_aborts() {
		let (dir, store) = seeded();
		let before: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
		for text in [Some("   ".to_string()), None] {
			let prompt = Scripted { text, ..Default::default() };
			let written = export(&store, Some("2024-01-01"), Some("2024-01-03"), None, &prompt).unwrap();
			assert_eq!(written, None);
			assert_eq!(prompt.asked.get(), 1);
		}
		let after: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
		assert_eq!(before.len(), after.len());
	}

	#[test]
	fn prompted_range_and_destination_export() {
		let (dir, store) = seeded();
		let out = dir.path().join("january.txt");
		let prompt = Scripted {
			date: Some(day(1)),
			confirm: Some(true),
			text: Some(out.display().to_string()),
			..Default::default()
		};
		let written = export(&store, None, Some("2024-01-03"), None, &prompt).unwrap();
		assert_eq!(written.as_deref(), Some(out.as_path()));
		assert_eq!(std::fs::read_to_string(&out).unwrap(), "2024-01-01\n  - Buy milk\n2024-01-03\n  - Call Bob\n");
	}
}
