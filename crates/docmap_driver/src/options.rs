//! Write and query options.

/// Default number of documents fetched per cursor round trip.
pub const DEFAULT_BATCH_SIZE: u32 = 101;

/// Acknowledgement level requested for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteConcern {
    /// Wait for the store to confirm the write; failures are reported.
    #[default]
    Acknowledged,
    /// Fire and forget; the store never reports failures back.
    Unacknowledged,
}

impl WriteConcern {
    /// Returns `true` if the caller waits for confirmation.
    #[must_use]
    pub const fn is_acknowledged(self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

/// Sort direction for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Options controlling a `find` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindOptions {
    /// Number of matching documents to skip.
    pub skip: usize,

    /// Maximum number of documents to return (`None` = unlimited).
    pub limit: Option<usize>,

    /// Documents fetched per round trip.
    pub batch_size: u32,

    /// Field path and direction to sort by.
    pub sort: Option<(String, SortOrder)>,

    /// Fields to return; `_id` is always included.
    pub projection: Option<Vec<String>>,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: None,
            batch_size: DEFAULT_BATCH_SIZE,
            sort: None,
            projection: None,
        }
    }
}

impl FindOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of documents to skip.
    #[must_use]
    pub const fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Sets the maximum number of documents to return.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the batch size. Zero is treated as one.
    #[must_use]
    pub const fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = if size == 0 { 1 } else { size };
        self
    }

    /// Sorts by a field path.
    #[must_use]
    pub fn sort(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((path.into(), order));
        self
    }

    /// Restricts the returned fields.
    #[must_use]
    pub fn projection<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = FindOptions::default();
        assert_eq!(options.skip, 0);
        assert_eq!(options.limit, None);
        assert_eq!(options.batch_size, DEFAULT_BATCH_SIZE);
        assert!(WriteConcern::default().is_acknowledged());
    }

    #[test]
    fn builder_pattern() {
        let options = FindOptions::new()
            .skip(2)
            .limit(5)
            .batch_size(0)
            .sort("age", SortOrder::Descending)
            .projection(["name"]);

        assert_eq!(options.skip, 2);
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.batch_size, 1);
        assert_eq!(options.sort, Some(("age".to_string(), SortOrder::Descending)));
        assert_eq!(options.projection, Some(vec!["name".to_string()]));
    }
}
