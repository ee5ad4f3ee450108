use serde::{Deserialize, Serialize};

/// One persisted (name, version) pin. Serialized with the `package` key
/// per the lock wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockEntry {
    pub package: String,
    pub version: String,
}

/// The ordered sequence of pins chosen for a dependency graph. Written and
/// read wholesale; entry order is significant and round-trips exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LockRecord {
    pub entries: Vec<LockEntry>,
}

impl LockRecord {
    pub fn new(entries: Vec<LockEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LockEntry> {
        self.entries.iter()
    }
}

impl FromIterator<LockEntry> for LockRecord {
    fn from_iter<I: IntoIterator<Item = LockEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LockRecord {
    type Item = &'a LockEntry;
    type IntoIter = std::slice::Iter<'a, LockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
