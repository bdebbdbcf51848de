//! Inline `style` attribute model
//!
//! Only the declaration-list syntax of a `style` attribute is handled here (`name: value;
//! name: value`). Names are lower-cased and declarations are kept sorted, so two styles with
//! the same declarations serialize to the same string and attribute comparisons during span
//! merging are exact.

use std::collections::BTreeMap;
use std::fmt;

pub const FONT_WEIGHT: &str = "font-weight";
pub const FONT_STYLE: &str = "font-style";
pub const TEXT_DECORATION: &str = "text-decoration";
pub const VERTICAL_ALIGN: &str = "vertical-align";
pub const COLOR: &str = "color";
pub const FONT_SIZE: &str = "font-size";

/// Properties that apply to characters rather than to blocks.
const INLINE_PROPERTIES: &[&str] = &[
    "background-color",
    COLOR,
    "font-family",
    FONT_SIZE,
    FONT_STYLE,
    "font-variant",
    FONT_WEIGHT,
    "letter-spacing",
    TEXT_DECORATION,
    "text-transform",
    VERTICAL_ALIGN,
];

pub fn is_inline_property(name: &str) -> bool {
    INLINE_PROPERTIES.contains(&name)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    properties: BTreeMap<String, String>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration list. Malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let mut style = InlineStyle::new();
        style.extend_from_str(text);
        style
    }

    /// Layer the declarations of `text` over this style.
    pub fn extend_from_str(&mut self, text: &str) {
        for declaration in text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            self.properties.insert(name, value.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.properties.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_bold(&self) -> bool {
        matches!(self.get(FONT_WEIGHT), Some("bold" | "bolder" | "700" | "800" | "900"))
    }

    pub fn set_bold(&mut self, on: bool) {
        if on {
            self.set(FONT_WEIGHT, "bold");
        } else {
            self.remove(FONT_WEIGHT);
        }
    }

    pub fn is_italic(&self) -> bool {
        matches!(self.get(FONT_STYLE), Some("italic" | "oblique"))
    }

    pub fn set_italic(&mut self, on: bool) {
        if on {
            self.set(FONT_STYLE, "italic");
        } else {
            self.remove(FONT_STYLE);
        }
    }

    pub fn has_decoration(&self, token: &str) -> bool {
        self.get(TEXT_DECORATION)
            .is_some_and(|v| v.split_whitespace().any(|t| t == token))
    }

    /// Add or remove one `text-decoration` keyword, keeping the others.
    pub fn set_decoration(&mut self, token: &str, on: bool) {
        let mut tokens: Vec<String> = self
            .get(TEXT_DECORATION)
            .map(|v| {
                v.split_whitespace()
                    .filter(|t| *t != token && *t != "none")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if on {
            tokens.push(token.to_string());
        }
        if tokens.is_empty() {
            self.remove(TEXT_DECORATION);
        } else {
            self.set(TEXT_DECORATION, tokens.join(" "));
        }
    }

    /// Split into (inline, block) declarations.
    pub fn partition_inline(&self) -> (InlineStyle, InlineStyle) {
        let mut inline = InlineStyle::new();
        let mut block = InlineStyle::new();
        for (name, value) in self.iter() {
            if is_inline_property(name) {
                inline.set(name, value);
            } else {
                block.set(name, value);
            }
        }
        (inline, block)
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.properties {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {value}")?;
            first = false;
        }
        Ok(())
    }
}
