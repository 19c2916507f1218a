//! The binding table.
//!
//! Maps `(mode, key, press kind, screen shape)` to an [`ActionTemplate`].
//! Entries may leave `mode`, `orientation` or `aspect` unset to match any
//! value. Lookup prefers the most specific entry; mode specificity outranks
//! orientation, which outranks aspect.

use crate::action::ActionTemplate;
use crate::error::{BindingError, BindingResult};
use keymapper_context::{AspectBucket, Mode, Orientation, ScreenShape};
use keymapper_input::{KeyCode, PressKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Schema version understood by this build.
pub const BINDINGS_VERSION: u32 = 1;

/// The table shipped with the binary.
pub const DEFAULT_BINDINGS_JSON: &str = include_str!("../data/default_bindings.json");

fn default_press() -> PressKind {
    PressKind::Short
}

/// One row of the bindings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingEntry {
    #[serde(default)]
    pub mode: Option<Mode>,
    pub key: KeyCode,
    #[serde(default = "default_press")]
    pub press: PressKind,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub aspect: Option<AspectBucket>,
    pub action: ActionTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BindingsDocument {
    version: u32,
    bindings: Vec<BindingEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RuleKey {
    mode: Option<Mode>,
    key: KeyCode,
    press: PressKind,
    orientation: Option<Orientation>,
    aspect: Option<AspectBucket>,
}

impl RuleKey {
    fn of(entry: &BindingEntry) -> Self {
        Self {
            mode: entry.mode,
            key: entry.key,
            press: entry.press,
            orientation: entry.orientation,
            aspect: entry.aspect,
        }
    }
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let any = "*";
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.mode.map(|m| m.as_str()).unwrap_or(any),
            self.key,
            self.press,
            match self.orientation {
                Some(Orientation::Portrait) => "portrait",
                Some(Orientation::Landscape) => "landscape",
                None => any,
            },
            match self.aspect {
                Some(a) => a.to_string(),
                None => any.to_string(),
            }
        )
    }
}

/// Immutable lookup from press context to action template.
#[derive(Debug, Clone)]
pub struct BindingTable {
    rules: HashMap<RuleKey, ActionTemplate>,
}

impl BindingTable {
    /// Load the table shipped with the binary.
    pub fn builtin() -> BindingResult<Self> {
        Self::from_json(DEFAULT_BINDINGS_JSON)
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> BindingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BindingError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), rules = table.len(), "loaded binding table");
        Ok(table)
    }

    /// Parse and validate a bindings document.
    pub fn from_json(content: &str) -> BindingResult<Self> {
        let doc: BindingsDocument = serde_json::from_str(content)?;

        if doc.version != BINDINGS_VERSION {
            return Err(BindingError::UnsupportedVersion {
                found: doc.version,
                expected: BINDINGS_VERSION,
            });
        }

        Self::from_entries(doc.bindings)
    }

    /// Build a table from entries, rejecting duplicates and bad templates.
    pub fn from_entries(entries: impl IntoIterator<Item = BindingEntry>) -> BindingResult<Self> {
        let mut rules = HashMap::new();

        for entry in entries {
            let key = RuleKey::of(&entry);

            if let Some(message) = entry.action.problem() {
                return Err(BindingError::InvalidBinding {
                    key: key.to_string(),
                    message: message.to_string(),
                });
            }

            if rules.insert(key, entry.action).is_some() {
                return Err(BindingError::DuplicateBinding {
                    key: key.to_string(),
                });
            }
        }

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the most specific template for a press.
    pub fn lookup(
        &self,
        mode: Mode,
        key: KeyCode,
        press: PressKind,
        shape: ScreenShape,
    ) -> Option<&ActionTemplate> {
        for mode in [Some(mode), None] {
            for orientation in [Some(shape.orientation), None] {
                for aspect in [Some(shape.aspect), None] {
                    let rule = RuleKey {
                        mode,
                        key,
                        press,
                        orientation,
                        aspect,
                    };
                    if let Some(template) = self.rules.get(&rule) {
                        return Some(template);
                    }
                }
            }
        }
        None
    }
}
