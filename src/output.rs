//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every slide is shown by its position first (zero-padded global index) and
//! its media second, with tags and links as indented context lines. Bundles
//! get their own sub-header so the hierarchy the navigation engine sees is
//! visible in the listing.
//!
//! # Output Format
//!
//! ## Slides
//!
//! ```text
//! News (5 slides)
//!     000 post 101  image  data/assets/a.png  ★
//!         Tags: llm, highlight
//!     Bundle 1
//!         002 post 102  video  data/assets/c.mp4
//!             Tags: vision
//! Exit (1 slide)
//!     011 exit  html
//! ```
//!
//! ## Play transcript
//!
//! ```text
//! ArrowRight  000 → 001  within-post             news/1
//! ArrowRight  001 → 002  between-posts push      news/2  [edge-flash]
//! ArrowRight  (ignored)
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::navigation::Transition;
use crate::render::RenderEvent;
use crate::tags::TagIndex;
use crate::types::{Media, Slide};
use std::collections::BTreeMap;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a zero-based index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn slide_line(slide: &Slide) -> String {
    let post = match &slide.post_id {
        Some(id) => format!("post {id}"),
        None => format!("post #{}", slide.post_index),
    };
    let mut line = format!(
        "{} {}  {}",
        format_index(slide.global_index),
        post,
        slide.asset.media.kind()
    );
    if let Some(source) = slide.asset.media.source() {
        line.push_str("  ");
        line.push_str(source);
    }
    if slide.is_highlight {
        line.push_str("  ★");
    }
    line
}

fn slide_context(slide: &Slide, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if !slide.asset.tags.is_empty() {
        lines.push(format!("{}Tags: {}", indent(depth), slide.asset.tags.join(", ")));
    }
    if let Media::Image { alt: Some(alt), .. } = &slide.asset.media {
        lines.push(format!("{}Alt: {}", indent(depth), alt));
    }
    if let Some(url) = &slide.post_url {
        lines.push(format!("{}Link: {}", indent(depth), url));
    }
    lines
}

// ============================================================================
// Slides
// ============================================================================

pub fn format_slides(slides: &[Slide]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut i = 0;
    while i < slides.len() {
        let section = &slides[i];
        let count = slides[i..]
            .iter()
            .take_while(|s| s.section_index == section.section_index)
            .count();
        lines.push(format!("{} ({})", section.section_name, plural(count, "slide")));

        let mut current_group = None;
        for slide in &slides[i..i + count] {
            let depth = if let Some(group) = slide.group_index {
                if current_group != Some(group) {
                    lines.push(format!("{}Bundle {}", indent(1), group));
                    current_group = Some(group);
                }
                2
            } else {
                current_group = None;
                1
            };
            if slide.section_key == crate::slides::EXIT_SECTION_KEY {
                lines.push(format!(
                    "{}{} exit  {}",
                    indent(depth),
                    format_index(slide.global_index),
                    slide.asset.media.kind()
                ));
                continue;
            }
            lines.push(format!("{}{}", indent(depth), slide_line(slide)));
            lines.extend(slide_context(slide, depth + 1));
        }
        i += count;
    }
    lines
}

pub fn print_slides(slides: &[Slide]) {
    for line in format_slides(slides) {
        println!("{}", line);
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Tags in alphabetical order with the number of slides carrying each.
pub fn format_tags(index: &TagIndex, slides: &[Slide]) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for slide in slides {
        for tag in slide.asset.folded_tags() {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    index
        .sorted()
        .map(|tag| {
            let n = counts.get(tag).copied().unwrap_or(0);
            let marker = if index.is_new(tag) { "  (new)" } else { "" };
            format!("{tag} ({}){marker}", plural(n, "slide"))
        })
        .collect()
}

pub fn print_tags(index: &TagIndex, slides: &[Slide]) {
    for line in format_tags(index, slides) {
        println!("{}", line);
    }
}

// ============================================================================
// Check summary
// ============================================================================

pub fn format_summary(title: Option<&str>, slides: &[Slide], index: &TagIndex) -> Vec<String> {
    let sections = {
        let mut keys: Vec<&str> = slides.iter().map(|s| s.section_key.as_str()).collect();
        keys.dedup();
        keys.len()
    };
    let videos = slides.iter().filter(|s| s.is_video()).count();
    let bundles = {
        let mut ids: Vec<_> = slides.iter().filter_map(Slide::bundle_id).collect();
        ids.dedup();
        ids.len()
    };
    let mut lines = Vec::new();
    if let Some(title) = title {
        lines.push(title.to_string());
    }
    lines.push(format!(
        "{} in {}, {}, {}, {}",
        plural(slides.len(), "slide"),
        plural(sections, "section"),
        plural(bundles, "bundle"),
        plural(videos, "video"),
        plural(index.all.len(), "tag"),
    ));
    lines
}

pub fn print_summary(title: Option<&str>, slides: &[Slide], index: &TagIndex) {
    for line in format_summary(title, slides, index) {
        println!("{}", line);
    }
}

// ============================================================================
// Play transcript
// ============================================================================

/// One transcript line for an input and the transition it caused, if any.
pub fn format_step(input: &str, transition: Option<&Transition>, location: Option<&str>) -> String {
    let Some(t) = transition else {
        return format!("{input:<11} (ignored)");
    };
    let stack = t.stack_action.map(|a| a.as_str()).unwrap_or("");
    let mut line = format!(
        "{input:<11} {} → {}  {:<22} {:<6} {}",
        format_index(t.from),
        format_index(t.to),
        t.kind.as_str(),
        stack,
        location.unwrap_or("")
    );
    if !t.cues.is_empty() {
        let cues: Vec<&str> = t.cues.iter().map(|c| c.as_str()).collect();
        line.push_str(&format!("  [{}]", cues.join(", ")));
    }
    line
}

/// Renderer calls worth showing in a transcript. Transitions and locations
/// are already on the step line.
pub fn format_render_events(events: &[RenderEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| {
            let text = match event {
                RenderEvent::PlayVideo(i) => format!("play video {}", format_index(*i)),
                RenderEvent::StopVideo(i) => format!("stop video {}", format_index(*i)),
                RenderEvent::StackDepths(depths) if !depths.is_empty() => {
                    let d: Vec<String> = depths
                        .iter()
                        .map(|d| format!("{}@{}", format_index(d.slide), d.depth))
                        .collect();
                    format!("stack {}", d.join(" "))
                }
                RenderEvent::StackFadeOut(slides) => {
                    let s: Vec<String> = slides.iter().map(|i| format_index(*i)).collect();
                    format!("fade out {}", s.join(" "))
                }
                RenderEvent::DeckReplaced { len, current } => {
                    format!("deck {} slides, at {}", len, format_index(*current))
                }
                RenderEvent::Placeholder(i) => format!("placeholder {}", format_index(*i)),
                _ => return None,
            };
            Some(format!("{}{}", indent(1), text))
        })
        .collect()
}
