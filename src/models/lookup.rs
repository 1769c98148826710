use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

/// An identifier exactly as the caller sent it, number or string.
///
/// `1` and `"1"` compare equal since both become the same object key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupKey {
    Int(i64),
    Text(String),
}

impl LookupKey {
    pub fn as_id(&self) -> Option<i32> {
        match self {
            LookupKey::Int(n) => i32::try_from(*n).ok(),
            LookupKey::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Int(n) => write!(f, "{}", n),
            LookupKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl PartialEq for LookupKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LookupKey::Int(a), LookupKey::Int(b)) => a == b,
            (LookupKey::Text(a), LookupKey::Text(b)) => a == b,
            (LookupKey::Int(n), LookupKey::Text(s)) | (LookupKey::Text(s), LookupKey::Int(n)) => {
                canonical_int(s) == Some(*n)
            }
        }
    }
}

impl Eq for LookupKey {}

impl Hash for LookupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            LookupKey::Int(n) => n.hash(state),
            LookupKey::Text(s) => match canonical_int(s) {
                Some(n) => n.hash(state),
                None => s.hash(state),
            },
        }
    }
}

/// The integer `s` spells, only when `s` is exactly how that integer prints.
fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let leading_zero = digits.len() > 1 && digits.starts_with('0');
    if s.starts_with('+') || leading_zero || s == "-0" {
        return None;
    }
    s.parse().ok()
}

impl From<i32> for LookupKey {
    fn from(id: i32) -> Self {
        LookupKey::Int(i64::from(id))
    }
}

impl From<&str> for LookupKey {
    fn from(id: &str) -> Self {
        LookupKey::Text(id.to_string())
    }
}

/// Map that remembers insertion order.
///
/// Re-inserting a key replaces its value but keeps its original position.
/// Serializes as a JSON object in insertion order.
#[derive(Debug, Clone)]
pub struct LookupMap<K, V> {
    entries: Vec<(K, V)>,
    positions: HashMap<K, usize>,
}

impl<K, V> Default for LookupMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for LookupMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash + Clone, V> LookupMap<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        match self.positions.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = *self.positions.get(key)?;
        Some(&mut self.entries[i].1)
    }
}

impl<K, V> LookupMap<K, V> {
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for LookupMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = LookupMap::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<K: fmt::Display, V: Serialize> Serialize for LookupMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}
