pub mod csv_export;
pub mod csv_import;
pub mod file;

pub use csv_export::export_moves_csv;
pub use csv_import::import_tasks_csv;
pub use file::load_snapshot;
