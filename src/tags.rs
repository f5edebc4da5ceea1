//! Tag index: the universe of tags in a deck and the subset flagged as new.
//!
//! Tags are case-folded to lowercase everywhere. `all` is collected from the
//! unfiltered deck so the tag cloud does not shrink when a filter is active;
//! `new` comes from the newsletter-level `new_tags` list and only affects
//! presentation.

use crate::types::Slide;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    pub all: BTreeSet<String>,
    pub new: BTreeSet<String>,
}

/// One chip in the tag cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub tag: String,
    pub is_new: bool,
    pub selected: bool,
    /// The tag is carried by the slide currently on screen.
    pub present: bool,
}

impl TagIndex {
    pub fn build(slides: &[Slide], new_tags: &[String]) -> Self {
        let all = slides
            .iter()
            .flat_map(|slide| slide.asset.folded_tags())
            .collect();
        let new = new_tags.iter().map(|t| t.to_lowercase()).collect();
        Self { all, new }
    }

    pub fn is_new(&self, tag: &str) -> bool {
        self.new.contains(&tag.to_lowercase())
    }

    /// Tags in alphabetical order.
    pub fn sorted(&self) -> impl Iterator<Item = &str> {
        self.all.iter().map(String::as_str)
    }

    /// Build the tag cloud for the current selection and slide.
    pub fn chips(&self, selected: &BTreeSet<String>, current: Option<&Slide>) -> Vec<TagChip> {
        let present: BTreeSet<String> = current
            .map(|slide| slide.asset.folded_tags().collect())
            .unwrap_or_default();
        self.all
            .iter()
            .map(|tag| TagChip {
                tag: tag.clone(),
                is_new: self.new.contains(tag),
                selected: selected.contains(tag),
                present: present.contains(tag),
            })
            .collect()
    }
}
