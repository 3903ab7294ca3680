pub mod errors;
mod loader;
pub mod model;

pub use errors::DataLoadError;
pub use loader::{load_path, load_reader, load_str};
pub use model::{CellValue, ColumnMapping, ColumnRole, RowSet, SampleRow};
