//! Date-keyed task list with JSON persistence, month-grid markers and
//! plain-text export of a date range.

pub mod calendar;
pub mod commands;
pub mod config;
pub mod dates;
pub mod export;
pub mod store;

pub use calendar::{render_month, CellPainter, HighlightPainter, PlainPainter};
pub use config::Config;
pub use export::{export_range, export_to_file};
pub use commands::{Prompt, TerminalPrompt, MAX_TASK_LEN};
pub use store::TaskStore;
