pub mod api;
pub mod csv_export;
pub mod export;
pub mod file;
pub mod payload;
pub mod xlsx_export;

pub use file::{load_snapshot, save_snapshot};
