use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::dates::date_key;
use crate::store::TaskStore;

/// Write one block per day in `start..=end` that has tasks:
///
/// ```text
/// 2024-01-01
///   - Buy milk
/// ```
///
/// Returns the number of blocks written. An inverted range writes nothing.
pub fn export_range<W: Write>(store: &TaskStore, start: NaiveDate, end: NaiveDate, out: &mut W) -> Result<usize> {
	let mut blocks = 0usize;
	for day in start.iter_days().take_while(|d| *d <= end) {
		let tasks = store.list_tasks(day);
		if tasks.is_empty() {
			continue;
		}
		writeln!(out, "{}", date_key(day))?;
		for task in tasks {
			writeln!(out, "  - {}", task)?;
		}
		blocks += 1;
	}
	Ok(blocks)
}

/// Export into `path`, replacing whatever was there.
pub fn export_to_file(store: &TaskStore, start: NaiveDate, end: NaiveDate, path: &Path) -> Result<usize> {
	let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
	let mut out = BufWriter::new(file);
	let blocks = export_range(store, start, end, &mut out).with_context(|| format!("write {}", path.display()))?;
	out.flush().with_context(|| format!("write {}", path.display()))?;
	info!(path = %path.display(), %start, %end, blocks, "exported tasks");
	Ok(blocks)
}
