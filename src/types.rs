//! Shared types produced by the slide index and consumed by every other stage.
//!
//! A [`Slide`] is one renderable asset in the flattened deck. Slides are built
//! once per data load and never mutated afterwards; filtering produces new
//! vectors of clones, and the stable [`Slide::global_index`] is how a slide is
//! found again after the visible set changes.

use serde::Serialize;
use std::fmt;

/// What a slide actually shows.
///
/// The source document spells this as a `type` string next to the asset
/// fields; here it is a closed variant so every consumer has to handle all
/// three cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Image {
        source: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Video {
        source: String,
    },
    Html {
        html: String,
    },
}

impl Media {
    pub fn kind(&self) -> &'static str {
        match self {
            Media::Image { .. } => "image",
            Media::Video { .. } => "video",
            Media::Html { .. } => "html",
        }
    }

    /// Resolved asset path, if the media is file-backed.
    pub fn source(&self) -> Option<&str> {
        match self {
            Media::Image { source, .. } | Media::Video { source } => Some(source),
            Media::Html { .. } => None,
        }
    }
}

/// A resolved asset: media plus the tags it was annotated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    #[serde(flatten)]
    pub media: Media,
    /// Tags exactly as written in the source document.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Asset {
    pub fn is_video(&self) -> bool {
        matches!(self.media, Media::Video { .. })
    }

    /// Case-folded tags.
    pub fn folded_tags(&self) -> impl Iterator<Item = String> + '_ {
        self.tags.iter().map(|t| t.to_lowercase())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Identity of a bundle (a group of posts inside a section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BundleId {
    pub section_index: usize,
    pub group_index: usize,
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section_index, self.group_index)
    }
}

/// One asset in the flattened deck, with its position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub section_index: usize,
    /// Lowercased section name, used in locations and tab lookups.
    pub section_key: String,
    pub section_name: String,
    /// `None` when the post is a plain section-level item.
    pub group_index: Option<usize>,
    /// Index of the post within its group, or within the section's items.
    pub post_index: usize,
    pub post_id: Option<String>,
    pub post_url: Option<String>,
    pub asset_index: usize,
    pub asset: Asset,
    /// Position in the unfiltered deck. Unique and strictly increasing.
    pub global_index: usize,
    /// First and last global index of the slides of this slide's post.
    pub post_start_index: usize,
    pub post_end_index: usize,
    pub is_highlight: bool,
}

impl Slide {
    pub fn bundle_id(&self) -> Option<BundleId> {
        self.group_index.map(|group_index| BundleId {
            section_index: self.section_index,
            group_index,
        })
    }

    pub fn is_bundled(&self) -> bool {
        self.group_index.is_some()
    }

    pub fn is_video(&self) -> bool {
        self.asset.is_video()
    }

    pub fn same_post(&self, other: &Slide) -> bool {
        self.section_index == other.section_index
            && self.group_index == other.group_index
            && self.post_index == other.post_index
    }

    pub fn same_group(&self, other: &Slide) -> bool {
        self.section_index == other.section_index && self.group_index == other.group_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SlideBuilder;

    #[test]
    fn bundle_id_only_for_grouped_slides() {
        let plain = SlideBuilder::new(0).section(1).post(2).build();
        let grouped = SlideBuilder::new(1).section(1).group(3).post(0).build();
        assert_eq!(plain.bundle_id(), None);
        assert_eq!(
            grouped.bundle_id(),
            Some(BundleId {
                section_index: 1,
                group_index: 3
            })
        );
        assert_eq!(grouped.bundle_id().unwrap().to_string(), "1-3");
    }

    #[test]
    fn same_post_compares_whole_hierarchy() {
        let a = SlideBuilder::new(0).section(0).group(1).post(0).build();
        let b = SlideBuilder::new(1).section(0).group(1).post(0).build();
        let c = SlideBuilder::new(2).section(0).group(2).post(0).build();
        assert!(a.same_post(&b));
        assert!(!a.same_post(&c));
        assert!(!a.same_group(&c));
    }

    #[test]
    fn tags_match_case_insensitively() {
        let slide = SlideBuilder::new(0).tags(&["LLM", "Vision"]).build();
        assert!(slide.asset.has_tag("llm"));
        let folded: Vec<String> = slide.asset.folded_tags().collect();
        assert_eq!(folded, vec!["llm", "vision"]);
    }

    #[test]
    fn media_source_absent_for_html() {
        let html = Media::Html {
            html: "<p>hi</p>".into(),
        };
        assert_eq!(html.source(), None);
        assert_eq!(html.kind(), "html");
        let video = Media::Video {
            source: "a.mp4".into(),
        };
        assert_eq!(video.source(), Some("a.mp4"));
    }
}
