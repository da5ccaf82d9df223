//! Dataset change notices
//!
//! Mutations reach cache consumers as a closed set of notice kinds. The
//! binning engine matches them exhaustively and decides between its fast
//! append path and invalidation; a host with a coarser channel can map
//! everything it does not recognize onto `ContextReset`.

use serde::{Deserialize, Serialize};

use crate::data::table::CaseId;

/// One dataset mutation, as delivered to cache consumers.
///
/// `CaseTable` mutators return the matching notice; the host forwards it
/// to every engine observing the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataChange {
    /// New cases were created. `inserted_at_end` is true when they were
    /// appended after all existing cases, in order.
    CasesAdded {
        ids: Vec<CaseId>,
        inserted_at_end: bool,
    },
    /// Cases were removed from the table.
    CasesDeleted { ids: Vec<CaseId> },
    /// Attribute values of existing cases changed.
    CasesChanged { ids: Vec<CaseId> },
    /// An axis assignment or classifier changed.
    ConfigChanged,
    /// The dataset was replaced or cleared wholesale.
    ContextReset,
}

impl DataChange {
    /// True for the one mutation shape the cache can patch in place.
    pub fn is_pure_append(&self) -> bool {
        matches!(
            self,
            DataChange::CasesAdded {
                inserted_at_end: true,
                ..
            }
        )
    }
}
