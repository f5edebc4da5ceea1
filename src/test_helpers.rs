//! Shared test utilities for the newsdeck test suite.
//!
//! Provides the sample newsletter from `fixtures/`, a default config, and a
//! [`SlideBuilder`] for hand-made decks where the fixture would be noise.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let slides = vec![
//!     SlideBuilder::new(0).section(0).key("news").tags(&["llm"]).build(),
//!     SlideBuilder::new(1).section(0).group(1).post(0).video().build(),
//! ];
//! ```

use crate::config::ViewerConfig;
use crate::data::{self, Newsletter};
use crate::types::{Asset, Media, Slide};

// =========================================================================
// Fixtures
// =========================================================================

const FIXTURE_YAML: &str = include_str!("../fixtures/newsletter.yaml");

/// The sample newsletter: three sections with plain posts, two bundles and
/// two videos. With the exit slide that is 12 slides.
pub fn fixture_newsletter() -> Newsletter {
    data::parse_yaml(FIXTURE_YAML).unwrap()
}

pub fn fixture_config() -> ViewerConfig {
    ViewerConfig::default()
}

// =========================================================================
// Slide builder
// =========================================================================

/// Builds a [`Slide`] with sensible defaults: section 0 keyed `s0`, plain
/// post 0, image asset, post range covering only itself.
pub struct SlideBuilder {
    slide: Slide,
    key_set: bool,
    range_set: bool,
}

impl SlideBuilder {
    pub fn new(global_index: usize) -> Self {
        Self {
            slide: Slide {
                section_index: 0,
                section_key: "s0".to_string(),
                section_name: "S0".to_string(),
                group_index: None,
                post_index: 0,
                post_id: None,
                post_url: None,
                asset_index: 0,
                asset: Asset {
                    media: Media::Image {
                        source: format!("img-{global_index}.png"),
                        alt: None,
                    },
                    tags: Vec::new(),
                },
                global_index,
                post_start_index: global_index,
                post_end_index: global_index,
                is_highlight: false,
            },
            key_set: false,
            range_set: false,
        }
    }

    /// Section index; the key follows as `s{n}` unless set with [`Self::key`].
    pub fn section(mut self, index: usize) -> Self {
        self.slide.section_index = index;
        if !self.key_set {
            self.slide.section_key = format!("s{index}");
            self.slide.section_name = format!("S{index}");
        }
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.slide.section_key = key.to_string();
        self.slide.section_name = key.to_string();
        self.key_set = true;
        self
    }

    pub fn group(mut self, index: usize) -> Self {
        self.slide.group_index = Some(index);
        self
    }

    pub fn post(mut self, index: usize) -> Self {
        self.slide.post_index = index;
        self
    }

    pub fn asset_index(mut self, index: usize) -> Self {
        self.slide.asset_index = index;
        self
    }

    /// Global index range of the slide's post.
    pub fn post_range(mut self, start: usize, end: usize) -> Self {
        self.slide.post_start_index = start;
        self.slide.post_end_index = end;
        self.range_set = true;
        self
    }

    pub fn video(mut self) -> Self {
        self.slide.asset.media = Media::Video {
            source: format!("clip-{}.mp4", self.slide.global_index),
        };
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.slide.asset.tags = tags.iter().map(|t| t.to_string()).collect();
        self.slide.is_highlight = self.slide.asset.has_tag("highlight");
        self
    }

    pub fn build(self) -> Slide {
        debug_assert!(
            !self.range_set
                || (self.slide.post_start_index..=self.slide.post_end_index)
                    .contains(&self.slide.global_index),
            "post range must contain the slide"
        );
        self.slide
    }
}
