//! ODM configuration.

use docmap_driver::{WriteConcern, DEFAULT_BATCH_SIZE};

/// Configuration shared by every binding of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdmConfig {
    /// Acknowledgement level for saves and removes.
    pub write_concern: WriteConcern,

    /// Documents fetched per cursor round trip.
    pub batch_size: u32,

    /// Whether a removed entity rejects further field writes and saves.
    pub reject_writes_after_remove: bool,
}

impl Default for OdmConfig {
    fn default() -> Self {
        Self {
            write_concern: WriteConcern::Acknowledged,
            batch_size: DEFAULT_BATCH_SIZE,
            reject_writes_after_remove: true,
        }
    }
}

impl OdmConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the write concern.
    #[must_use]
    pub const fn write_concern(mut self, concern: WriteConcern) -> Self {
        self.write_concern = concern;
        self
    }

    /// Sets the cursor batch size. Zero is treated as one.
    #[must_use]
    pub const fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sets whether removed entities reject writes.
    #[must_use]
    pub const fn reject_writes_after_remove(mut self, value: bool) -> Self {
        self.reject_writes_after_remove = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = OdmConfig::default();
        assert_eq!(config.write_concern, WriteConcern::Acknowledged);
        assert_eq!(config.batch_size, 101);
        assert!(config.reject_writes_after_remove);
    }

    #[test]
    fn builder_pattern() {
        let config = OdmConfig::new()
            .write_concern(WriteConcern::Unacknowledged)
            .batch_size(0)
            .reject_writes_after_remove(false);

        assert!(!config.write_concern.is_acknowledged());
        assert_eq!(config.batch_size, 1);
        assert!(!config.reject_writes_after_remove);
    }
}
