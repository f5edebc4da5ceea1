//! Slide index: flattens the newsletter hierarchy into the deck.
//!
//! Traversal is a single left-to-right walk of
//! `section → (group | none) → post → asset`, emitting one [`Slide`] per
//! asset:
//!
//! ```text
//! News                       global  group  post  asset
//! ├── post 101 (2 assets)    0, 1    -      0     0, 1
//! └── group 1
//!     ├── post 102           2       1      0     0
//!     └── post 103           3       1      1     0
//! Exit (synthetic)           4       -      0     0
//! ```
//!
//! Every slide records the global range of its post (`post_start_index ..=
//! post_end_index`), which the video tracker later uses for activation ranges.
//! A single synthetic `exit` slide (HTML) is appended after all sections.
//!
//! Sections without a name are skipped, as are items that are neither a post
//! nor a group. Nothing here can fail: the only fatal data problem (a missing
//! `newsletter` root) is caught when the document is parsed.

use crate::config::{ExitConfig, ViewerConfig};
use crate::data::{Item, Newsletter, RawAsset};
use crate::types::{Asset, Media, Slide};
use maud::html;

/// Section key of the synthetic terminal slide.
pub const EXIT_SECTION_KEY: &str = "exit";

/// Tag that marks an asset as a highlight.
const HIGHLIGHT_TAG: &str = "highlight";

/// Build the full, unfiltered deck.
pub fn build(newsletter: &Newsletter, config: &ViewerConfig) -> Vec<Slide> {
    let mut builder = DeckBuilder {
        config,
        slides: Vec::new(),
    };

    for (section_index, entry) in newsletter.sections.iter().enumerate() {
        let Some(entry) = entry else { continue };
        let Some(name) = entry.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        let section = SectionRef {
            index: section_index,
            key: name.to_lowercase(),
            name: name.to_string(),
        };

        for (item_index, item) in entry.items.iter().enumerate() {
            if item.is_post() {
                builder.push_post(&section, None, item_index, item);
            } else if item.is_group() {
                for (post_index, post) in item.posts().iter().enumerate() {
                    builder.push_post(&section, Some(item_index), post_index, post);
                }
            }
        }
    }

    let exit_section_index = newsletter.sections.len();
    builder.push_exit(exit_section_index, &config.exit);

    tracing::debug!(slides = builder.slides.len(), "built slide index");
    builder.slides
}

struct SectionRef {
    index: usize,
    key: String,
    name: String,
}

struct DeckBuilder<'a> {
    config: &'a ViewerConfig,
    slides: Vec<Slide>,
}

impl DeckBuilder<'_> {
    fn push_post(
        &mut self,
        section: &SectionRef,
        group_index: Option<usize>,
        post_index: usize,
        post: &Item,
    ) {
        let assets = post.assets();
        let post_start_index = self.slides.len();
        let post_end_index = (post_start_index + assets.len()).saturating_sub(1);

        for (asset_index, raw) in assets.iter().enumerate() {
            let asset = resolve_asset(raw, self.config);
            let is_highlight = asset.has_tag(HIGHLIGHT_TAG);
            let global_index = self.slides.len();
            self.slides.push(Slide {
                section_index: section.index,
                section_key: section.key.clone(),
                section_name: section.name.clone(),
                group_index,
                post_index,
                post_id: post.id.clone(),
                post_url: raw.url.clone().or_else(|| post.url.clone()),
                asset_index,
                asset,
                global_index,
                post_start_index,
                post_end_index,
                is_highlight,
            });
        }
    }

    fn push_exit(&mut self, section_index: usize, exit: &ExitConfig) {
        let global_index = self.slides.len();
        self.slides.push(Slide {
            section_index,
            section_key: EXIT_SECTION_KEY.to_string(),
            section_name: exit.name.clone(),
            group_index: None,
            post_index: 0,
            post_id: Some(EXIT_SECTION_KEY.to_string()),
            post_url: None,
            asset_index: 0,
            asset: Asset {
                media: Media::Html {
                    html: render_exit_html(exit),
                },
                tags: Vec::new(),
            },
            global_index,
            post_start_index: global_index,
            post_end_index: global_index,
            is_highlight: false,
        });
    }
}

/// Resolve a raw asset: pick the media variant and rewrite the source path
/// relative to the configured base path.
fn resolve_asset(raw: &RawAsset, config: &ViewerConfig) -> Asset {
    let source = || resolve_source(raw.source.as_deref().unwrap_or_default(), config);
    let media = match raw.kind.as_deref() {
        Some("video") => Media::Video { source: source() },
        Some("html") => Media::Html {
            html: raw.html.clone().unwrap_or_default(),
        },
        Some("image") | None => Media::Image {
            source: source(),
            alt: raw.alt.clone(),
        },
        Some(other) => {
            tracing::warn!(kind = other, "unknown asset type, treating as image");
            Media::Image {
                source: source(),
                alt: raw.alt.clone(),
            }
        }
    };
    Asset {
        media,
        tags: raw.tags.clone(),
    }
}

/// Join `source` onto the asset base path, dropping a redundant prefix.
pub fn resolve_source(source: &str, config: &ViewerConfig) -> String {
    let trimmed = if config.strip_prefix.is_empty() {
        source
    } else {
        source.strip_prefix(&config.strip_prefix).unwrap_or(source)
    };
    format!("{}{}", config.asset_base_path, trimmed)
}

fn render_exit_html(exit: &ExitConfig) -> String {
    html! {
        div.exit-slide-content {
            div.exit-slide-inner {
                img.exit-qr-code src=(exit.qr_image) alt="QR Code";
                div.exit-message {
                    p.exit-label {
                        a href=(exit.archive_url) { strong { (exit.archive_label) } }
                    }
                    p.exit-tagline { (exit.tagline) }
                }
            }
        }
    }
    .into_string()
}
