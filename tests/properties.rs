//! Property tests over randomly shaped newsletters and navigation scripts.

use newsdeck::config::ViewerConfig;
use newsdeck::data::{Item, Newsletter, RawAsset, Section};
use newsdeck::filter::{self, ViewMode};
use newsdeck::navigation::{Direction, Intent, NavigationEngine};
use newsdeck::render::{Recorder, RenderEvent};
use newsdeck::slides::{self, EXIT_SECTION_KEY};
use newsdeck::types::Slide;
use newsdeck::video::ActivationRanges;
use proptest::prelude::*;
use std::collections::BTreeSet;

const TAGS: &[&str] = &["llm", "vision", "rl", "audio"];
const SELECTABLE: &[&str] = &["llm", "vision", "rl", "audio", "unused"];

// ============================================================================
// Strategies
// ============================================================================

fn asset() -> impl Strategy<Value = RawAsset> {
    (
        prop::bool::weighted(0.2),
        prop::sample::subsequence(TAGS, 0..=2),
    )
        .prop_map(|(video, tags)| RawAsset {
            source: Some(if video { "clip.mp4" } else { "still.png" }.to_string()),
            kind: video.then(|| "video".to_string()),
            tags: tags.into_iter().map(str::to_string).collect(),
            ..Default::default()
        })
}

fn post() -> impl Strategy<Value = Item> {
    prop::collection::vec(asset(), 1..4).prop_map(|assets| Item {
        assets: Some(assets),
        ..Default::default()
    })
}

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![
        post(),
        prop::collection::vec(post(), 1..4).prop_map(|posts| Item {
            items: Some(posts),
            ..Default::default()
        }),
    ]
}

fn newsletter() -> impl Strategy<Value = Newsletter> {
    prop::collection::vec(prop::collection::vec(item(), 0..4), 0..5).prop_map(|sections| {
        Newsletter {
            sections: sections
                .into_iter()
                .enumerate()
                .map(|(i, items)| {
                    Some(Section {
                        name: Some(format!("S{i}")),
                        items,
                    })
                })
                .collect(),
            ..Default::default()
        }
    })
}

fn selection() -> impl Strategy<Value = BTreeSet<String>> {
    prop::sample::subsequence(SELECTABLE, 0..=3)
        .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        3 => Just(Intent::Horizontal(Direction::Next)),
        2 => Just(Intent::Horizontal(Direction::Prev)),
        1 => Just(Intent::Vertical(Direction::Next)),
        1 => Just(Intent::Vertical(Direction::Prev)),
        1 => (0usize..5).prop_map(|i| Intent::JumpToSection(format!("s{i}"))),
        1 => Just(Intent::JumpToSection(EXIT_SECTION_KEY.to_string())),
    ]
}

fn deck(newsletter: &Newsletter, selected: &BTreeSet<String>) -> Vec<Slide> {
    let all = slides::build(newsletter, &ViewerConfig::default());
    filter::apply(&all, ViewMode::Personalized, selected)
}

fn engine(slides: Vec<Slide>, current: usize) -> NavigationEngine<Recorder> {
    let config = ViewerConfig::default();
    NavigationEngine::new(
        slides,
        current,
        config.transitions.clone(),
        config.stack.max_depth,
        Recorder::new(),
    )
}

/// Videos the renderer was told to play and not yet told to stop.
fn playing_after(events: &[RenderEvent]) -> Result<BTreeSet<usize>, TestCaseError> {
    let mut playing = BTreeSet::new();
    for event in events {
        match event {
            RenderEvent::PlayVideo(i) => {
                playing.insert(*i);
            }
            RenderEvent::StopVideo(i) => {
                playing.remove(i);
            }
            _ => {}
        }
        prop_assert!(playing.len() <= 1, "more than one video playing: {:?}", playing);
    }
    Ok(playing)
}

proptest! {
    #[test]
    fn global_indices_increase_and_exit_is_last(newsletter in newsletter()) {
        let slides = slides::build(&newsletter, &ViewerConfig::default());
        prop_assert!(!slides.is_empty());
        for (i, slide) in slides.iter().enumerate() {
            prop_assert_eq!(slide.global_index, i);
            prop_assert!(slide.post_start_index <= i && i <= slide.post_end_index);
        }
        let exits = slides.iter().filter(|s| s.section_key == EXIT_SECTION_KEY).count();
        prop_assert_eq!(exits, 1);
        prop_assert_eq!(slides.last().map(|s| s.section_key.as_str()), Some(EXIT_SECTION_KEY));
    }

    #[test]
    fn filter_never_empties_the_deck(newsletter in newsletter(), selected in selection()) {
        let all = slides::build(&newsletter, &ViewerConfig::default());
        let visible = filter::apply(&all, ViewMode::Personalized, &selected);
        prop_assert!(!visible.is_empty());
        prop_assert!(visible.windows(2).all(|w| w[0].global_index < w[1].global_index));
    }

    #[test]
    fn navigation_stays_in_bounds_and_off_the_stack(
        newsletter in newsletter(),
        selected in selection(),
        start in 0usize..64,
        script in prop::collection::vec(intent(), 0..40),
    ) {
        let slides = deck(&newsletter, &selected);
        let len = slides.len();
        let mut engine = engine(slides, start);
        prop_assert!(engine.current_index() < len);

        for intent in &script {
            engine.navigate(intent);
            prop_assert!(engine.current_index() < len);
            prop_assert!(!engine.stack().contains(engine.current_index()));
            engine.settle();
            prop_assert!(!engine.is_animating());
        }
        playing_after(&engine.renderer().events)?;
    }

    #[test]
    fn navigation_while_animating_changes_nothing(
        newsletter in newsletter(),
        start in 0usize..64,
        first in intent(),
        second in intent(),
    ) {
        let slides = deck(&newsletter, &BTreeSet::new());
        let mut engine = engine(slides, start);
        if engine.navigate(&first).is_none() {
            return Ok(());
        }
        prop_assert!(engine.is_animating());
        let index = engine.current_index();
        let stack = engine.stack().entries().to_vec();

        prop_assert!(engine.navigate(&second).is_none());
        prop_assert_eq!(engine.current_index(), index);
        prop_assert_eq!(engine.stack().entries(), stack.as_slice());
    }

    #[test]
    fn active_video_is_a_video_at_or_before_the_slide(
        newsletter in newsletter(),
        selected in selection(),
    ) {
        let slides = deck(&newsletter, &selected);
        let ranges = ActivationRanges::build(&slides);
        for i in 0..slides.len() {
            if let Some(video) = ranges.find_active_video(i) {
                prop_assert!(video <= i);
                prop_assert!(slides[video].is_video());
                if slides[i].is_video() {
                    prop_assert_eq!(video, i);
                }
            }
        }
    }
}
