//! Typed metadata storage for image files.
//!
//! The darkroom pipeline only round-trips a handful of fields (image
//! dimensions, resolution, and a few descriptive TIFF tags), so this is a
//! small typed map rather than a full EXIF/MakerNote attribute system.

use std::collections::HashMap;

/// A metadata value attached to an image.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// UTF-8 string (Software, Artist, DateTime, ...).
    Str(String),
    /// Unsigned 32-bit integer (ImageWidth, ImageHeight, BitsPerSample, ...).
    UInt(u32),
    /// 32-bit float (XResolution, YResolution, ...).
    Float(f32),
}

impl AttrValue {
    /// Returns the value as a string slice, if it is one.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as `u32`, if it is one.
    #[inline]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AttrValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `f32`, converting from `UInt` where sensible.
    #[inline]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::UInt(v) => Some(*v as f32),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::UInt(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v)
    }
}

/// String-keyed metadata container carried on [`crate::Metadata`].
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    map: HashMap<String, AttrValue>,
}

impl Attrs {
    /// Creates an empty attribute container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.map.insert(key.into(), value.into());
    }

    /// Looks up an attribute by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.map.get(key)
    }

    /// Looks up a string attribute by key.
    #[inline]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    /// Looks up a `u32` attribute by key.
    #[inline]
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(AttrValue::as_u32)
    }

    /// Looks up an `f32` attribute by key.
    #[inline]
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(AttrValue::as_f32)
    }

    /// Number of stored attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the container holds no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trips_each_variant() {
        let mut attrs = Attrs::new();
        attrs.set("Software", "darkroom-io");
        attrs.set("ImageWidth", 1920u32);
        attrs.set("XResolution", 300.0f32);

        assert_eq!(attrs.get_str("Software"), Some("darkroom-io"));
        assert_eq!(attrs.get_u32("ImageWidth"), Some(1920));
        assert_eq!(attrs.get_f32("XResolution"), Some(300.0));
    }

    #[test]
    fn uint_coerces_to_f32() {
        let mut attrs = Attrs::new();
        attrs.set("BitsPerSample", 16u32);
        assert_eq!(attrs.get_f32("BitsPerSample"), Some(16.0));
    }

    #[test]
    fn missing_key_is_none() {
        let attrs = Attrs::new();
        assert_eq!(attrs.get("Missing"), None);
    }
}
