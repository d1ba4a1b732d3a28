//! Storage port for batch resources.

use crate::domain::Result;

/// Byte storage addressed by resource key.
///
/// Implementations perform each call independently; nothing here serializes
/// a sequence of calls, so a length check followed by a read may observe
/// different states if another writer shares the key.
pub trait BatchStorage {
    /// Size in bytes, or `None` if the resource does not exist.
    fn len(&self, key: &str) -> Result<Option<u64>>;

    /// Creates or overwrites the resource.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Appends to the resource, creating it if needed.
    fn append(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Full content, or `None` if the resource does not exist.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Deletes the resource. Returns `false` if it was already absent.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Human-readable location of a resource, for status output.
    fn describe(&self, key: &str) -> String;
}
