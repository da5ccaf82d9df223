//! chart-oxide: the data engine for categorical ("dot chart" style)
//! statistics visualizations
//!
//! The centerpiece is [`CellCache`]: it bins every case of a
//! [`CaseTable`] into a two-dimensional grid of cells keyed by the values
//! of two categorical attributes, keeps a reverse index from case to
//! cell, and keeps both consistent as cases are appended, removed, or
//! edited — rebuilding lazily only when an incremental patch is not
//! enough. Rendering is not part of this crate; consumers read cell
//! counts, stacking orders, and reverse lookups and draw them however
//! they like.
//!
//! ```
//! use chart_oxide::{CaseTable, CategoryAxis, CellCache, ChartConfig, Value};
//!
//! let mut table = CaseTable::new(&["species", "habitat"]);
//! let change = table
//!     .append_cases(vec![
//!         vec![Value::text("wren"), Value::text("forest")],
//!         vec![Value::text("heron"), Value::text("wetland")],
//!         vec![Value::text("wren"), Value::text("forest")],
//!     ])
//!     .unwrap();
//!
//! let mut config = ChartConfig::new();
//! config.set_primary(0, Box::new(CategoryAxis::for_attribute(&table, 0).unwrap()));
//! config.set_secondary(1, Box::new(CategoryAxis::for_attribute(&table, 1).unwrap()));
//!
//! let mut cache = CellCache::new();
//! cache.handle_change(&table, &config, &change);
//! let counts = cache.cell_counts(&table, &config);
//! assert_eq!(counts[0].count, 2); // two wrens in the forest
//! ```

pub mod axis;
pub mod cell_cache;
pub mod config;
pub mod data;
pub mod error;
pub mod util;

pub use axis::{CategoryAxis, CellClassifier};
pub use cell_cache::{BinPosition, CellCache, CellCount, CellEntry};
pub use config::{AxisSlot, BinningContext, ChartConfig};
pub use data::{Attribute, CaseId, CaseTable, DataChange, Value};
pub use error::{ChartError, Result};
