//! Shareable position paths: `section/n`.
//!
//! `n` is the zero-based position of the slide among the *visible* slides of
//! its section, so a path taken in one view mode may land elsewhere (or
//! nowhere) in another. Parsing tolerates a leading `#`; anything malformed
//! or unmatched yields `None` and the caller falls back to the first slide.

use crate::types::Slide;

/// Path for the slide at `index`, or `None` if out of range.
pub fn format_location(slides: &[Slide], index: usize) -> Option<String> {
    let slide = slides.get(index)?;
    let n = slides[..index]
        .iter()
        .filter(|s| s.section_key == slide.section_key)
        .count();
    Some(format!("{}/{n}", slide.section_key))
}

/// Index of the slide addressed by `path`.
pub fn parse_location(slides: &[Slide], path: &str) -> Option<usize> {
    let path = path.strip_prefix('#').unwrap_or(path);
    let (key, n) = path.split_once('/')?;
    if n.contains('/') {
        return None;
    }
    let n: usize = n.trim().parse().ok()?;
    slides
        .iter()
        .enumerate()
        .filter(|(_, s)| s.section_key == key)
        .nth(n)
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SlideBuilder;

    fn deck() -> Vec<Slide> {
        vec![
            SlideBuilder::new(0).section(0).key("news").build(),
            SlideBuilder::new(1).section(0).key("news").build(),
            SlideBuilder::new(2).section(1).key("papers").build(),
            SlideBuilder::new(3).section(1).key("papers").build(),
            SlideBuilder::new(4).section(2).key("exit").build(),
        ]
    }

    #[test]
    fn format_counts_within_section() {
        let slides = deck();
        assert_eq!(format_location(&slides, 0).as_deref(), Some("news/0"));
        assert_eq!(format_location(&slides, 3).as_deref(), Some("papers/1"));
        assert_eq!(format_location(&slides, 4).as_deref(), Some("exit/0"));
        assert_eq!(format_location(&slides, 5), None);
    }

    #[test]
    fn parse_finds_slide() {
        let slides = deck();
        assert_eq!(parse_location(&slides, "papers/1"), Some(3));
        assert_eq!(parse_location(&slides, "#news/1"), Some(1));
    }

    #[test]
    fn parse_rejects_malformed_or_unmatched() {
        let slides = deck();
        for path in ["", "#", "news", "news/x", "news/1/2", "blogs/0", "news/7", "news/-1"] {
            assert_eq!(parse_location(&slides, path), None, "{path}");
        }
    }

    #[test]
    fn format_then_parse_is_identity() {
        let slides = deck();
        for index in 0..slides.len() {
            let path = format_location(&slides, index).unwrap();
            assert_eq!(parse_location(&slides, &path), Some(index));
        }
    }
}
