// 🍲 Entry - one potluck contribution
//
// Entries have no identity beyond their position in the store. The fingerprint
// lets a client prove which entry it saw at an index, so a mutation aimed at a
// position that has since shifted can be refused instead of hitting a neighbour.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub category: String,
    pub dish: String,
    pub quantity: u32,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        dish: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Entry {
            name: name.into(),
            category: category.into(),
            dish: dish.into(),
            quantity,
        }
    }

    /// Content hash of the four fields (hex SHA-256).
    ///
    /// Each field is prefixed with its byte length, so no choice of field
    /// contents can make two different entries feed the same bytes.
    pub fn fingerprint(&self) -> String {
        let quantity = self.quantity.to_string();
        let mut hasher = Sha256::new();
        for field in [&self.name, &self.category, &self.dish, &quantity] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

/// An entry together with the address a client needs to mutate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRef {
    pub index: usize,
    pub fingerprint: String,
    pub entry: Entry,
}

impl EntryRef {
    pub fn new(index: usize, entry: Entry) -> Self {
        EntryRef {
            index,
            fingerprint: entry.fingerprint(),
            entry,
        }
    }
}
