use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::window::{AssignmentSource, MergedWindowRecord};

/// Last known display per window identity key.
///
/// Three independent maps, consulted in order: window id, then
/// `"pid#windowNumber"`, then bundle identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffinityCache {
    #[serde(default)]
    by_window_id: BTreeMap<u32, u32>,
    #[serde(default)]
    by_process_window: BTreeMap<String, u32>,
    #[serde(default)]
    by_bundle: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// One known-good observation to write into all three maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityUpdate {
    pub window_id: Option<u32>,
    pub process_window: Option<String>,
    pub bundle_id: String,
    pub display_id: u32,
}

impl AffinityUpdate {
    pub fn for_window(window: &MergedWindowRecord, display_id: u32) -> Self {
        Self {
            window_id: window.window_id,
            process_window: window.process_window_key(),
            bundle_id: window.bundle_id.clone(),
            display_id,
        }
    }
}

impl AffinityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached display for a window, with the key that produced it.
    pub fn lookup(&self, window: &MergedWindowRecord) -> Option<(u32, AssignmentSource)> {
        if let Some(id) = window.window_id
            && let Some(display) = self.by_window_id.get(&id)
        {
            return Some((*display, AssignmentSource::CacheWindowId));
        }
        if let Some(key) = window.process_window_key()
            && let Some(display) = self.by_process_window.get(&key)
        {
            return Some((*display, AssignmentSource::CacheProcessWindow));
        }
        self.by_bundle
            .get(&window.bundle_id)
            .map(|display| (*display, AssignmentSource::CacheBundle))
    }

    /// Write every update, in order. Returns whether any entry changed.
    pub fn apply(&mut self, updates: &[AffinityUpdate]) -> bool {
        let mut changed = false;
        for update in updates {
            if let Some(id) = update.window_id {
                changed |= self.by_window_id.insert(id, update.display_id) != Some(update.display_id);
            }
            if let Some(key) = &update.process_window {
                changed |= self
                    .by_process_window
                    .insert(key.clone(), update.display_id)
                    != Some(update.display_id);
            }
            if !update.bundle_id.is_empty() {
                changed |= self
                    .by_bundle
                    .insert(update.bundle_id.clone(), update.display_id)
                    != Some(update.display_id);
            }
        }
        if changed {
            self.updated_at = Some(Utc::now());
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.by_window_id.is_empty() && self.by_process_window.is_empty() && self.by_bundle.is_empty()
    }

    /// Total entries across all three maps.
    pub fn len(&self) -> usize {
        self.by_window_id.len() + self.by_process_window.len() + self.by_bundle.len()
    }

    pub fn by_window_id(&self) -> &BTreeMap<u32, u32> {
        &self.by_window_id
    }
    pub fn by_process_window(&self) -> &BTreeMap<String, u32> {
        &self.by_process_window
    }
    pub fn by_bundle(&self) -> &BTreeMap<String, u32> {
        &self.by_bundle
    }
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::geometry::Rect;

    fn window(window_id: Option<u32>, window_number: Option<i64>) -> MergedWindowRecord {
        MergedWindowRecord {
            pid: 412,
            bundle_id: "com.apple.Notes".to_string(),
            window_id,
            window_number,
            title: "Notes".to_string(),
            normalized_title: "Notes".to_string(),
            frame: Rect::ZERO,
            minimized: true,
            active: false,
            fullscreen: false,
            sources: BTreeSet::new(),
        }
    }

    #[test]
    fn test_apply_writes_all_three_keys() {
        let mut cache = AffinityCache::new();
        let changed = cache.apply(&[AffinityUpdate::for_window(&window(Some(7), Some(3)), 2)]);

        assert!(changed);
        assert_eq!(cache.by_window_id().get(&7), Some(&2));
        assert_eq!(cache.by_process_window().get("412#3"), Some(&2));
        assert_eq!(cache.by_bundle().get("com.apple.Notes"), Some(&2));
        assert_eq!(cache.len(), 3);
        assert!(cache.updated_at().is_some());
    }

    #[test]
    fn test_reapplying_same_display_is_not_a_change() {
        let mut cache = AffinityCache::new();
        let update = AffinityUpdate::for_window(&window(Some(7), None), 2);
        assert!(cache.apply(std::slice::from_ref(&update)));
        assert!(!cache.apply(&[update]));
        assert!(!cache.apply(&[]));
    }

    #[test]
    fn test_lookup_order() {
        let mut cache = AffinityCache::new();
        cache.by_window_id.insert(7, 1);
        cache.by_process_window.insert("412#3".to_string(), 2);
        cache.by_bundle.insert("com.apple.Notes".to_string(), 3);

        assert_eq!(
            cache.lookup(&window(Some(7), Some(3))),
            Some((1, AssignmentSource::CacheWindowId))
        );
        assert_eq!(
            cache.lookup(&window(Some(8), Some(3))),
            Some((2, AssignmentSource::CacheProcessWindow))
        );
        assert_eq!(
            cache.lookup(&window(None, None)),
            Some((3, AssignmentSource::CacheBundle))
        );
        assert_eq!(AffinityCache::new().lookup(&window(Some(7), None)), None);
    }

    #[test]
    fn test_json_keeps_integer_keys() {
        let mut cache = AffinityCache::new();
        cache.apply(&[AffinityUpdate::for_window(&window(Some(7), Some(3)), 2)]);

        let json = serde_json::to_string(&cache).unwrap();
        let restored: AffinityCache = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cache);
    }

    #[test]
    fn test_missing_maps_deserialize_empty() {
        let cache: AffinityCache = serde_json::from_str(r#"{"by_bundle":{"a":4}}"#).unwrap();
        assert!(cache.by_window_id().is_empty());
        assert_eq!(cache.by_bundle().get("a"), Some(&4));
        assert_eq!(cache.updated_at(), None);
    }
}
