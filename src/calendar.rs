use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use colored::Colorize;

use crate::store::TaskStore;

/// Decorates a single day cell of the month grid.
///
/// `cell` is the default rendering (day number right-aligned to two
/// columns); the returned string replaces it. Implementations must keep the
/// visible width at three columns so the grid stays aligned.
pub trait CellPainter {
	fn paint(&self, date: NaiveDate, cell: &str, has_tasks: bool) -> String;
}

/// Dark red background on marked days, bold underline on the selected one.
pub struct HighlightPainter {
	pub selected: NaiveDate,
}

impl CellPainter for HighlightPainter {
	fn paint(&self, date: NaiveDate, cell: &str, has_tasks: bool) -> String {
		let mut styled = cell.normal();
		if has_tasks {
			styled = styled.on_truecolor(139, 0, 0).white();
		}
		if date == self.selected {
			styled = styled.bold().underline();
		}
		format!("{} ", styled)
	}
}

/// Colourless markers: `*` after days with tasks, `<` after the selected day
/// when it has none.
pub struct PlainPainter {
	pub selected: Option<NaiveDate>,
}

impl CellPainter for PlainPainter {
	fn paint(&self, date: NaiveDate, cell: &str, has_tasks: bool) -> String {
		let mark = if has_tasks {
			'*'
		} else if self.selected == Some(date) {
			'<'
		} else {
			' '
		};
		format!("{}{}", cell, mark)
	}
}

/// Render the month containing `base`, Monday first. Each cell asks `store`
/// whether the day has tasks, so markers always reflect the current state.
pub fn render_month(base: NaiveDate, store: &TaskStore, painter: &dyn CellPainter) -> Result<String> {
	let first = NaiveDate::from_ymd_opt(base.year(), base.month(), 1).context("invalid month")?;
	let next_month = first.checked_add_months(chrono::Months::new(1)).context("month out of range")?;
	let last_day = next_month.pred_opt().context("month out of range")?.day();

	let mut out = String::new();
	out.push_str(&format!("{}-{:02}\n", base.year(), base.month()));
	out.push_str("Mo Tu We Th Fr Sa Su\n");
	let offset = first.weekday().num_days_from_monday();
	for _ in 0..offset {
		out.push_str("   ");
	}
	for d in 1..=last_day {
		let cur = NaiveDate::from_ymd_opt(base.year(), base.month(), d).context("invalid day")?;
		let cell = format!("{:>2}", d);
		out.push_str(&painter.paint(cur, &cell, store.has_tasks(cur)));
		if cur.weekday().number_from_monday() == 7 && d != last_day {
			out.push('\n');
		}
	}
	out.push('\n');
	Ok(out)
}
