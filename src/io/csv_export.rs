use std::path::Path;

use crate::error::Result;
use crate::model::EventMove;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Write an accepted move list as a semicolon-delimited CSV.
///
/// Columns: Task ; Start ; End. Returns the number of moves written.
pub fn export_moves_csv(moves: &[EventMove], path: &Path) -> Result<usize> {
    let wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    write_moves(wtr, moves)
}

fn write_moves<W: std::io::Write>(mut wtr: csv::Writer<W>, moves: &[EventMove]) -> Result<usize> {
    wtr.write_record(["Task", "Start", "End"])?;
    for mv in moves {
        let start = mv.new_start_time.format(TIME_FORMAT).to_string();
        let end = mv.new_end_time.format(TIME_FORMAT).to_string();
        wtr.write_record([mv.event_id.as_str(), start.as_str(), end.as_str()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(moves.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_moves() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let moves = vec![EventMove {
            event_id: "event-1".into(),
            new_start_time: day.and_hms_opt(11, 30, 0).unwrap(),
            new_end_time: day.and_hms_opt(12, 30, 0).unwrap(),
        }];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.csv");
        assert_eq!(export_moves_csv(&moves, &path).unwrap(), 1);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Task;Start;End\nevent-1;2024-03-04 11:30;2024-03-04 12:30\n");
    }
}
