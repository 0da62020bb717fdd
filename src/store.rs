use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::dates::date_key;

/// Date key -> tasks in insertion order.
pub type TaskMap = BTreeMap<String, Vec<String>>;

/// Tasks keyed by date, persisted as one JSON document.
///
/// Every mutating call rewrites the whole file before returning. Lists that
/// become empty stay in the map so a cleared date is still present on disk.
#[derive(Debug)]
pub struct TaskStore {
	path: PathBuf,
	tasks: TaskMap,
}

impl TaskStore {
	/// Empty store that will persist to `path`. Nothing is written yet.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), tasks: TaskMap::new() }
	}

	/// Load the store at `path`. A missing file is an empty store; an
	/// unreadable or malformed one is an error.
	pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let contents = match fs::read_to_string(&path) {
			Ok(s) => s,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %path.display(), "no task store yet, starting empty");
				return Ok(Self::new(path));
			}
			Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
		};
		let tasks: TaskMap = serde_json::from_str(&contents).with_context(|| format!("parse task store {}", path.display()))?;
		debug!(path = %path.display(), dates = tasks.len(), "loaded task store");
		Ok(Self { path, tasks })
	}

	/// Overwrite the backing file with the full map, indented by four spaces.
	pub fn save(&self) -> Result<()> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
		}
		let mut buf = Vec::new();
		let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
		let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
		self.tasks.serialize(&mut ser).context("serialize task store")?;
		fs::write(&self.path, &buf).with_context(|| format!("write {}", self.path.display()))?;
		debug!(path = %self.path.display(), dates = self.tasks.len(), "saved task store");
		Ok(())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn tasks(&self) -> &TaskMap {
		&self.tasks
	}

	/// Append `text` to the tasks of `date`. Empty text is ignored and
	/// returns `false`; anything else is saved immediately.
	pub fn add_task(&mut self, date: NaiveDate, text: &str) -> Result<bool> {
		if text.is_empty() {
			return Ok(false);
		}
		let key = date_key(date);
		info!(date = %key, task = %text, "add task");
		self.tasks.entry(key).or_default().push(text.to_string());
		self.save()?;
		Ok(true)
	}

	/// Tasks for `date`, or an empty slice when the date has none.
	pub fn list_tasks(&self, date: NaiveDate) -> &[String] {
		self.tasks.get(&date_key(date)).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn has_tasks(&self, date: NaiveDate) -> bool {
		!self.list_tasks(date).is_empty()
	}

	/// Remove the first task of `date` equal to `text`. Returns whether one
	/// was removed; a miss leaves the store and the file untouched.
	pub fn delete_task(&mut self, date: NaiveDate, text: &str) -> Result<bool> {
		let key = date_key(date);
		let Some(list) = self.tasks.get_mut(&key) else { return Ok(false) };
		let Some(idx) = list.iter().position(|t| t == text) else { return Ok(false) };
		list.remove(idx);
		info!(date = %key, task = %text, "delete task");
		self.save()?;
		Ok(true)
	}

	/// Remove the task at a 1-based `position` in the list of `date`.
	/// Returns the removed text, or `None` when the position is out of range.
	pub fn delete_task_at(&mut self, date: NaiveDate, position: usize) -> Result<Option<String>> {
		let key = date_key(date);
		let Some(list) = self.tasks.get_mut(&key) else { return Ok(None) };
		if position == 0 || position > list.len() {
			return Ok(None);
		}
		let removed = list.remove(position - 1);
		info!(date = %key, task = %removed, position, "delete task");
		self.save()?;
		Ok(Some(removed))
	}

	/// Empty the list of `date`, keeping the key. Returns how many tasks were
	/// dropped; a date that is not stored is left alone and nothing is saved.
	pub fn clear_tasks(&mut self, date: NaiveDate) -> Result<usize> {
		let key = date_key(date);
		let Some(list) = self.tasks.get_mut(&key) else { return Ok(0) };
		let dropped = list.len();
		list.clear();
		info!(date = %key, count = dropped, "clear tasks");
		self.save()?;
		Ok(dropped)
	}

	/// Stored date keys in ascending order with their task counts.
	pub fn dates(&self) -> impl Iterator<Item = (&str, usize)> {
		self.tasks.iter().map(|(k, v)| (k.as_str(), v.len()))
	}
}
