pub mod change;
pub mod source;
pub mod table;

// Re-export key types for convenience
pub use change::DataChange;
pub use source::{from_dataframe, load_table};
pub use table::{Attribute, CaseId, CaseTable, Value};
