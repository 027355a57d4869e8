use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Resource type a cached query depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Question,
    Quiz,
    Announcement,
}

#[derive(Debug)]
struct Entry {
    value: Value,
    tags: Vec<Tag>,
}

/// Query results keyed by request, each remembering the tags it provides.
/// A successful mutation invalidates every entry sharing one of its tags.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Entry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, or `None` on a miss or when the cached value
    /// does not deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn insert<T: Serialize>(&mut self, key: impl Into<String>, tags: &[Tag], value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(key.into(), Entry { value, tags: tags.to_vec() });
            }
            Err(e) => log::warn!("not caching unserializable value: {}", e),
        }
    }

    /// Drops every entry providing any of `tags` and returns how many went.
    pub fn invalidate(&mut self, tags: &[Tag]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.tags.iter().any(|t| tags.contains(t)));
        let dropped = before - self.entries.len();
        log::debug!("invalidated {} cached queries for {:?}", dropped, tags);
        dropped
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalidate_only_matching_tags() {
        let mut cache = QueryCache::new();
        cache.insert("questions", &[Tag::Question], &vec!["q1"]);
        cache.insert("quizzes", &[Tag::Quiz], &vec!["z1"]);
        cache.insert("announcements", &[Tag::Announcement], &vec!["a1"]);
        assert_eq!(cache.invalidate(&[Tag::Quiz]), 1);
        assert!(!cache.contains("quizzes"));
        assert_eq!(cache.get::<Vec<String>>("questions"), Some(vec!["q1".to_string()]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_entry_with_several_tags() {
        let mut cache = QueryCache::new();
        cache.insert("dashboard", &[Tag::Quiz, Tag::Announcement], &1);
        cache.invalidate(&[Tag::Announcement]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_a_miss() {
        let mut cache = QueryCache::new();
        cache.insert("n", &[Tag::Question], &"text");
        assert_eq!(cache.get::<u32>("n"), None);
        assert_eq!(cache.get::<String>("missing"), None);
    }
}
