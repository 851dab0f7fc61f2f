//! Progress store abstraction.
//!
//! The persisted record is a single scene index kept under
//! [`PROGRESS_KEY`] as its decimal string representation.

use async_trait::async_trait;

use crate::error::StorageError;

/// Key under which the current scene index is stored.
pub const PROGRESS_KEY: &str = "currentSceneIndex";

/// Durable, device-local storage for the player's current scene index.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Returns the last persisted index, or `None` if nothing was ever written.
    async fn read(&self) -> Result<Option<usize>, StorageError>;

    /// Persists `index`, overwriting any previous value.
    async fn write(&self, index: usize) -> Result<(), StorageError>;
}

/// Encodes an index the way it is persisted.
#[must_use]
pub fn encode_index(index: usize) -> String {
    index.to_string()
}

/// Parses a persisted value back into an index.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` unless `raw` is a non-negative decimal
/// integer (surrounding whitespace is tolerated).
pub fn decode_index(raw: &str) -> Result<usize, StorageError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| StorageError::Corrupt(format!("{raw:?} is not a scene index: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_index_reads_decimal_string() {
        assert_eq!(decode_index(&encode_index(42)), Ok(42));
        assert_eq!(decode_index(" 7\n"), Ok(7));
    }

    #[test]
    fn test_decode_index_rejects_negative_and_garbage() {
        assert!(matches!(decode_index("-1"), Err(StorageError::Corrupt(_))));
        assert!(matches!(decode_index("two"), Err(StorageError::Corrupt(_))));
        assert!(matches!(decode_index(""), Err(StorageError::Corrupt(_))));
    }
}
