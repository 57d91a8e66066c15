//! LRU cache for reusable GPU scratch textures.
//!
//! Unlike [`super::cache::RegionCache`], which caches a specific source
//! region's uploaded contents, this pool hands out scratch textures keyed by
//! shape and intended use so the tiled runner isn't allocating (and
//! deallocating) a fresh device texture for every tile it processes.

use std::collections::HashMap;

use super::memory::cache_budget;

/// Key identifying a pool-eligible texture shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Backend-defined usage flags (e.g. a `wgpu::TextureUsages` bitmask).
    pub usage: u32,
    /// Caller-assigned label distinguishing otherwise-identical shapes
    /// (e.g. "source" vs "destination").
    pub label: &'static str,
}

impl TextureKey {
    pub fn new(width: u32, height: u32, usage: u32, label: &'static str) -> Self {
        Self { width, height, usage, label }
    }
}

/// Pool of reusable GPU texture handles, generic over the backend's texture
/// type `T`.
pub struct TextureCache<T> {
    slots: HashMap<TextureKey, Vec<T>>,
    bytes_per_slot: HashMap<TextureKey, u64>,
    total_bytes: u64,
    max_bytes: u64,
}

impl<T> TextureCache<T> {
    /// Create a pool with the default memory budget.
    pub fn new() -> Self {
        Self::with_budget(cache_budget())
    }

    /// Create a pool with an explicit byte budget.
    pub fn with_budget(max_bytes: u64) -> Self {
        Self {
            slots: HashMap::new(),
            bytes_per_slot: HashMap::new(),
            total_bytes: 0,
            max_bytes,
        }
    }

    /// Take a texture matching `key` out of the pool, if one is idle.
    pub fn acquire(&mut self, key: &TextureKey) -> Option<T> {
        let texture = self.slots.get_mut(key).and_then(Vec::pop)?;
        if let Some(&size) = self.bytes_per_slot.get(key) {
            self.total_bytes = self.total_bytes.saturating_sub(size);
        }
        Some(texture)
    }

    /// Return a texture to the pool for reuse, evicting older idle entries
    /// first if needed to stay within budget.
    pub fn release(&mut self, key: TextureKey, texture: T, size_bytes: u64) {
        while self.total_bytes + size_bytes > self.max_bytes && self.evict_one() {}

        self.bytes_per_slot.insert(key.clone(), size_bytes);
        self.slots.entry(key).or_default().push(texture);
        self.total_bytes += size_bytes;
    }

    /// Drop every pooled texture.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.bytes_per_slot.clear();
        self.total_bytes = 0;
    }

    /// Bytes currently held by idle pooled textures.
    pub fn size_bytes(&self) -> u64 {
        self.total_bytes
    }

    fn evict_one(&mut self) -> bool {
        let Some(key) = self.slots.keys().next().cloned() else {
            return false;
        };
        if let Some(textures) = self.slots.get_mut(&key) {
            textures.pop();
            if textures.is_empty() {
                self.slots.remove(&key);
            }
        }
        if let Some(&size) = self.bytes_per_slot.get(&key) {
            self.total_bytes = self.total_bytes.saturating_sub(size);
        }
        true
    }
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_after_release_reuses_the_same_slot() {
        let mut cache: TextureCache<u32> = TextureCache::with_budget(1000);
        let key = TextureKey::new(512, 512, 0, "scratch");

        assert!(cache.acquire(&key).is_none());
        cache.release(key.clone(), 7, 100);
        assert_eq!(cache.acquire(&key), Some(7));
        assert!(cache.acquire(&key).is_none());
    }

    #[test]
    fn distinct_labels_do_not_share_a_slot() {
        let mut cache: TextureCache<u32> = TextureCache::with_budget(1000);
        let src = TextureKey::new(256, 256, 0, "source");
        let dst = TextureKey::new(256, 256, 0, "destination");

        cache.release(src.clone(), 1, 50);
        assert!(cache.acquire(&dst).is_none());
        assert_eq!(cache.acquire(&src), Some(1));
    }

    #[test]
    fn eviction_keeps_pool_within_budget() {
        let mut cache: TextureCache<u32> = TextureCache::with_budget(150);
        let a = TextureKey::new(128, 128, 0, "a");
        let b = TextureKey::new(128, 128, 0, "b");

        cache.release(a.clone(), 1, 100);
        cache.release(b.clone(), 2, 100);

        assert!(cache.size_bytes() <= 150);
    }
}
