// Record trait for anything kept in a storage slot

use serde::{Deserialize, Serialize};

/// Core trait that any storable record must implement
pub trait Record: Serialize + for<'de> Deserialize<'de> + Clone + 'static {
    /// Unique identifier for this record within its collection
    fn id(&self) -> &str;

    /// Collection name for this record type (e.g., "todos")
    /// Used as the default storage key: {collection}.json
    fn collection_name() -> &'static str
    where
        Self: Sized;

    /// Records failing this check are dropped when a slot is loaded
    fn is_valid(&self) -> bool {
        true
    }
}
