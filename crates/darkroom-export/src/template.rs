//! Filename templating (`spec.md` §4.9, grounded on the original's
//! `FilenameTemplater`).
//!
//! Patterns use `{{ key }}` placeholders rather than a full template
//! engine; the original's variable set (`original_name`, `mode`,
//! `colorspace`, `border`, plus an implicit `date`) doesn't need
//! conditionals or loops, so a token substitution pass covers it without
//! pulling in a Jinja2-equivalent dependency.

use std::collections::HashMap;

use chrono::Local;

/// Variables available to a filename pattern, built by the caller from the
/// export's [`crate::compositor::ExportOutcome`] and source file metadata.
#[derive(Debug, Clone)]
pub struct FilenameContext {
    /// Source file's base name, extension stripped.
    pub original_name: String,
    /// The process mode string, e.g. `"C41"`.
    pub mode: String,
    /// The export color space string, e.g. `"Greyscale"`.
    pub colorspace: String,
    /// `"border"` when a border was applied, else empty.
    pub border: String,
}

impl FilenameContext {
    fn as_map(&self) -> HashMap<&'static str, String> {
        let mut map = HashMap::new();
        map.insert("original_name", self.original_name.clone());
        map.insert("mode", self.mode.clone());
        map.insert("colorspace", self.colorspace.clone());
        map.insert("border", self.border.clone());
        map.insert("date", Local::now().date_naive().to_string());
        map
    }
}

/// Renders `pattern`'s `{{ key }}` placeholders against `ctx`. Unknown keys
/// render as an empty string. Falls back to `"positive_{original_name}"`
/// when the rendered result is empty (the original's documented failure
/// mode for a pattern that renders to nothing).
pub fn render_filename(pattern: &str, ctx: &FilenameContext) -> String {
    let vars = ctx.as_map();
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        rest = &rest[start + 2..];
        match rest.find("}}") {
            Some(end) => {
                let key = rest[..end].trim();
                if let Some(value) = vars.get(key) {
                    out.push_str(value);
                }
                rest = &rest[end + 2..];
            }
            None => {
                out.push_str("{{");
                break;
            }
        }
    }
    out.push_str(rest);

    let trimmed = out.trim();
    if trimmed.is_empty() {
        format!("positive_{}", ctx.original_name)
    } else {
        trimmed.to_string()
    }
}
