use std::path::Path;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Row,
    Title,
    Start,
    End,
    Status,
}

/// Try parsing a timestamp with the formats hosts commonly export.
fn parse_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "id" | "eventid" | "taskid" => Some(Column::Id),
        "row" | "rowid" | "lane" | "resource" | "station" => Some(Column::Row),
        "title" | "task" | "name" | "label" | "tasklabel" => Some(Column::Title),
        "start" | "starttime" | "from" | "begin" => Some(Column::Start),
        "end" | "endtime" | "to" | "finish" => Some(Column::End),
        "status" | "state" => Some(Column::Status),
        _ => None,
    }
}

/// Import tasks from a delimited text file.
///
/// Auto-detects the delimiter (semicolon, tab, comma) and matches headers
/// loosely. Rows with unparseable times are skipped and counted.
/// Returns `(tasks, skipped_count)`.
pub fn import_tasks_csv(path: &Path) -> Result<(Vec<Task>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_tasks_csv(&content)
}

pub fn parse_tasks_csv(content: &str) -> Result<(Vec<Task>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();

    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Row) || !has(Column::Start) || !has(Column::End) {
        return Err(Error::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let field = |c: Column| {
            columns
                .iter()
                .position(|col| *col == Some(c))
                .and_then(|idx| record.get(idx))
                .unwrap_or("")
        };

        let row_id = field(Column::Row);
        if row_id.is_empty() {
            skipped += 1;
            continue;
        }

        let start = parse_time(field(Column::Start));
        let end = parse_time(field(Column::End));
        let (Some(start), Some(end)) = (start, end) else {
            warn!(
                line,
                start = field(Column::Start),
                end = field(Column::End),
                "skipping row with invalid times"
            );
            skipped += 1;
            continue;
        };
        if end <= start {
            warn!(line, "skipping row that ends before it starts");
            skipped += 1;
            continue;
        }

        let mut task = Task::new(row_id, field(Column::Title), start, end);
        if !field(Column::Id).is_empty() {
            task.id = field(Column::Id).to_string();
        }
        let status = field(Column::Status);
        if !status.is_empty() {
            task.status = TaskStatus::parse(status).unwrap_or_else(|| {
                warn!(line, status, "unknown status, using planned");
                TaskStatus::Planned
            });
        }
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(Error::NoTasks { skipped });
    }
    Ok((tasks, skipped))
}
