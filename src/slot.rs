// Slot encoding: a whole collection as one JSON array

use crate::error::StorageError;
use crate::record::Record;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Serialize the full collection into one slot value
pub fn encode<T: Record>(records: &[T]) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Deserialize a slot value, dropping whatever cannot be trusted.
///
/// A value that is not a JSON array yields an empty collection. Inside the
/// array, elements that fail to parse, fail `Record::is_valid`, or repeat an
/// earlier id are skipped; the first occurrence of an id wins.
pub fn decode<T: Record>(raw: &str) -> Vec<T> {
    let items: Vec<Value> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(
                collection = T::collection_name(),
                error = ?e,
                "Stored collection is corrupt, starting empty"
            );
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let record: T = match serde_json::from_value(item) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    collection = T::collection_name(),
                    index,
                    error = ?e,
                    "Failed to parse record, skipping"
                );
                continue;
            }
        };

        if !record.is_valid() {
            warn!(
                collection = T::collection_name(),
                index,
                id = record.id(),
                "Invalid record, skipping"
            );
            continue;
        }

        if !seen.insert(record.id().to_string()) {
            warn!(
                collection = T::collection_name(),
                index,
                id = record.id(),
                "Duplicate id, skipping"
            );
            continue;
        }

        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Task};

    fn task(id: &str, description: &str) -> Task {
        Task {
            id: id.to_string(),
            description: description.to_string(),
            due_date: Some("2024-01-10".parse().unwrap()),
            due_time: None,
            priority: Priority::Medium,
            completed: true,
        }
    }

    #[test]
    fn test_encode_decode_preserves_records() {
        let tasks = vec![task("a", "First"), task("b", "Second")];

        let raw = encode(&tasks).unwrap();
        let decoded: Vec<Task> = decode(&raw);
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_encode_is_json_array() {
        let raw = encode(&[task("a", "First")]).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["dueDate"], "2024-01-10");
        assert!(value[0]["dueTime"].is_null());
    }

    #[test]
    fn test_decode_corrupt_yields_empty() {
        let decoded: Vec<Task> = decode("{not json");
        assert!(decoded.is_empty());

        let decoded: Vec<Task> = decode(r#"{"id":"a"}"#);
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_records() {
        let raw = r#"[
            {"id":"a","description":"Valid","priority":"low","completed":false},
            {"id":"b","description":"Bad priority","priority":"urgent"},
            {"id":"c","description":"   "},
            {"id":"d","description":"Also valid","dueDate":"2024-01-05","dueTime":"08:00","priority":"high","completed":true}
        ]"#;

        let decoded: Vec<Task> = decode(raw);
        let ids: Vec<&str> = decoded.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_decode_first_duplicate_wins() {
        let raw = r#"[
            {"id":"a","description":"Original"},
            {"id":"a","description":"Copy"}
        ]"#;

        let decoded: Vec<Task> = decode(raw);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].description, "Original");
    }
}
