//! Composite item address.

/// Address of a stored item: the item id plus its partition key.
///
/// Both components are required; an item cannot be read, replaced or deleted
/// without the pair. Ordering is `(partition_key, id)` so listings group by
/// partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub partition_key: String,
    pub id: String,
}

impl ItemKey {
    pub fn new(id: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.id)
    }
}
