pub mod math;

/// Insertion-ordered hash map used for every count and vocabulary table.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;
/// Insertion-ordered hash set.
pub type OrderedSet<K> = indexmap::IndexSet<K, ahash::RandomState>;
