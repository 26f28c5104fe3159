//! Palette and palette entry models.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// One allowed output color plus its display metadata.
///
/// Entries are created when palette definitions are loaded and live for the
/// session. The target `color` never changes during a run; only `enabled`
/// is mutated, by the pruning step or by interactive toggles, and takes
/// effect on the next quantization pass.
///
/// # Example
///
/// ```
/// use bead_dither::{PaletteEntry, Rgba};
///
/// let entry = PaletteEntry::new("Black", "H18", Rgba::opaque(0, 0, 0));
/// assert!(entry.enabled);
/// assert_eq!(entry.prefixed_ref(), "H18");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Display name of the bead color
    pub name: String,
    /// Short reference code printed on the pattern
    #[serde(rename = "ref")]
    pub ref_code: String,
    /// Optional symbol for colorblind-friendly printing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Optional prefix disambiguating ref codes when palettes are merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Target bead color; immutable during a run
    pub color: Rgba,
    /// Whether this entry takes part in quantization
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PaletteEntry {
    /// Create an enabled entry with no symbol or prefix.
    pub fn new(name: impl Into<String>, ref_code: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            ref_code: ref_code.into(),
            symbol: None,
            prefix: None,
            color,
            enabled: true,
        }
    }

    /// Attach a ref-code prefix (builder style).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Attach a printed symbol (builder style).
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// The prefix-qualified ref code.
    ///
    /// This is the key used by usage aggregation and pruning, so two merged
    /// palettes with colliding bare refs stay distinct.
    pub fn prefixed_ref(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{}", self.ref_code),
            None => self.ref_code.clone(),
        }
    }
}

/// A named, ordered list of palette entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Palette name (e.g. the bead brand and size)
    pub name: String,
    /// Entries in definition order
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Create a palette from a name and entries.
    pub fn new(name: impl Into<String>, entries: Vec<PaletteEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Number of entries, enabled or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the enabled entries in definition order.
    pub fn enabled_entries(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter().filter(|e| e.enabled)
    }
}
