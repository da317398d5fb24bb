// Entity Models
// - Entry: one contribution, addressed by position, guarded by fingerprint
// - CategoryRegistry: the allowed category labels

pub mod category;
pub mod entry;

pub use category::{CategoryRegistry, DEFAULT_CATEGORIES};
pub use entry::{Entry, EntryRef};
