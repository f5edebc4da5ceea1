//! Visibility filter: which slides are in the deck right now.
//!
//! - [`ViewMode::All`], or no tags selected: every slide, in order.
//! - [`ViewMode::Personalized`] with tags selected: slides carrying at least
//!   one selected tag (OR semantics).
//! - A filter that matches nothing falls back to the full deck, so the viewer
//!   never presents an empty deck.
//!
//! [`apply`] is pure; [`relocate`] maps a stable `global_index` back into a
//! freshly filtered deck.

use crate::types::Slide;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Viewing mode, persisted between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    All,
    Personalized,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::All => "all",
            ViewMode::Personalized => "personalized",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::All => ViewMode::Personalized,
            ViewMode::Personalized => ViewMode::All,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ViewMode::All),
            "personalized" => Ok(ViewMode::Personalized),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// Compute the visible deck. `selected` must hold lowercase tags.
pub fn apply(all: &[Slide], mode: ViewMode, selected: &BTreeSet<String>) -> Vec<Slide> {
    if mode == ViewMode::All || selected.is_empty() {
        return all.to_vec();
    }

    let visible: Vec<Slide> = all
        .iter()
        .filter(|slide| slide.asset.folded_tags().any(|t| selected.contains(&t)))
        .cloned()
        .collect();

    if visible.is_empty() {
        tracing::debug!(?selected, "tag filter matched nothing, showing all slides");
        return all.to_vec();
    }
    visible
}

/// Find where a slide with `global_index` lives in `visible`.
///
/// Returns the slide itself when present, otherwise the first slide after it
/// in global order, otherwise the last slide. An empty deck yields 0.
pub fn relocate(visible: &[Slide], global_index: usize) -> usize {
    let after = visible.partition_point(|s| s.global_index < global_index);
    if after < visible.len() {
        after
    } else {
        visible.len().saturating_sub(1)
    }
}
