//! Navigation engine: the state machine behind every position change.
//!
//! ## Intents
//!
//! - [`Intent::Horizontal`]: the adjacent visible slide. The hierarchy
//!   boundary crossed picks the [`TransitionKind`] and the bundle stack action.
//! - [`Intent::Vertical`]: the first slide of the nearest section with visible
//!   slides in that direction.
//! - [`Intent::JumpToSection`]: the first visible slide of a section (tab
//!   click).
//!
//! ## Horizontal classification
//!
//! | current vs target | kind | stack |
//! |---|---|---|
//! | same post | `WithinPost` | none |
//! | same bundle, other post | `BetweenPosts` | pop if target stacked, else push current |
//! | same section, plain posts | `BetweenPosts` | none |
//! | same section, other group | `BetweenGroups` | clear |
//! | other section | `SectionHorizontal` | clear |
//!
//! Vertical and jump navigation are always `Section` + clear.
//!
//! ## One transition at a time
//!
//! An accepted navigation sets the animating flag, commits the new index
//! immediately and schedules its own completion on the engine's
//! [`Scheduler`]. Requests arriving before that completion runs are dropped,
//! not queued. Scheduled completions carry a generation number so a deck
//! rebuild in between turns them into no-ops.

use crate::config::TransitionTimings;
use crate::location::format_location;
use crate::render::Renderer;
use crate::schedule::{Scheduler, TaskHandle};
use crate::stack::BundleStack;
use crate::types::Slide;
use crate::video::VideoActivationTracker;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }

    /// Neighbouring index in this direction, if it stays within `len`.
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        let target = match self {
            Direction::Next => index.checked_add(1)?,
            Direction::Prev => index.checked_sub(1)?,
        };
        (target < len).then_some(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Horizontal(Direction),
    Vertical(Direction),
    /// Jump to the first visible slide of the section with this key.
    JumpToSection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    WithinPost,
    BetweenPosts,
    BetweenGroups,
    SectionHorizontal,
    Section,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::WithinPost => "within-post",
            TransitionKind::BetweenPosts => "between-posts",
            TransitionKind::BetweenGroups => "between-groups",
            TransitionKind::SectionHorizontal => "section-horizontal",
            TransitionKind::Section => "section",
        }
    }

    pub fn duration_ms(self, timings: &TransitionTimings) -> u64 {
        match self {
            TransitionKind::WithinPost => timings.within_post,
            TransitionKind::BetweenPosts => timings.between_posts,
            TransitionKind::BetweenGroups => timings.between_groups,
            TransitionKind::SectionHorizontal => timings.section_horizontal,
            TransitionKind::Section => timings.section,
        }
    }

    /// Extra delay before cleanup, letting post-level entrances settle.
    pub fn settle_ms(self, timings: &TransitionTimings) -> u64 {
        match self {
            TransitionKind::BetweenPosts => timings.micro_settle,
            _ => 0,
        }
    }

    pub fn crosses_section(self) -> bool {
        matches!(self, TransitionKind::SectionHorizontal | TransitionKind::Section)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackAction {
    /// Set the current slide aside on the bundle stack.
    Push,
    /// Bring the (stacked) target back in place.
    Pop,
    Clear,
}

impl StackAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StackAction::Push => "push",
            StackAction::Pop => "pop",
            StackAction::Clear => "clear",
        }
    }
}

/// Visual accents the renderer layers on top of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Thin flash on the screen edge we move towards.
    EdgeFlash(Direction),
    /// Directional sheen across the screen.
    Sheen(Direction),
    ScaleEnter,
    /// Small vertical drift foreshadowing a section change.
    AxisHint(Direction),
    SectionOverlay,
    /// Pulse the active section tab.
    TabPulse,
    DepthSwap,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::EdgeFlash(_) => "edge-flash",
            Cue::Sheen(_) => "sheen",
            Cue::ScaleEnter => "scale-enter",
            Cue::AxisHint(_) => "axis-hint",
            Cue::SectionOverlay => "section-overlay",
            Cue::TabPulse => "tab-pulse",
            Cue::DepthSwap => "depth-swap",
        }
    }
}

/// One accepted navigation, as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
    pub kind: TransitionKind,
    pub stack_action: Option<StackAction>,
    pub duration_ms: u64,
    pub settle_ms: u64,
    pub cues: Vec<Cue>,
}

impl Transition {
    /// Time until the engine accepts the next navigation.
    pub fn total_ms(&self) -> u64 {
        self.duration_ms + self.settle_ms
    }
}

/// Classify a horizontal move from `current` to the adjacent `target`.
pub fn classify(
    current: &Slide,
    target: &Slide,
    target_index: usize,
    stack: &BundleStack,
) -> (TransitionKind, Option<StackAction>) {
    if current.section_index != target.section_index {
        return (TransitionKind::SectionHorizontal, Some(StackAction::Clear));
    }
    if current.group_index != target.group_index {
        return (TransitionKind::BetweenGroups, Some(StackAction::Clear));
    }
    if current.same_post(target) {
        return (TransitionKind::WithinPost, None);
    }
    let action = current.is_bundled().then(|| {
        if stack.contains(target_index) {
            StackAction::Pop
        } else {
            StackAction::Push
        }
    });
    (TransitionKind::BetweenPosts, action)
}

/// Cues for a transition of `kind` with the given stack action.
pub fn cues(kind: TransitionKind, action: Option<StackAction>, direction: Direction) -> Vec<Cue> {
    match (kind, action) {
        (_, Some(StackAction::Push)) => vec![Cue::EdgeFlash(direction)],
        (_, Some(StackAction::Pop)) => Vec::new(),
        (TransitionKind::WithinPost, _) => Vec::new(),
        (TransitionKind::BetweenPosts, _) => vec![Cue::EdgeFlash(direction)],
        (TransitionKind::BetweenGroups, _) => vec![
            Cue::EdgeFlash(direction),
            Cue::Sheen(direction),
            Cue::ScaleEnter,
        ],
        (TransitionKind::SectionHorizontal, _) => vec![
            Cue::AxisHint(direction),
            Cue::SectionOverlay,
            Cue::TabPulse,
        ],
        (TransitionKind::Section, _) => vec![Cue::DepthSwap, Cue::SectionOverlay, Cue::TabPulse],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineTask {
    FinishTransition { generation: u64 },
    StackFadeComplete { generation: u64, slides: Vec<usize> },
}

/// Owns the visible deck, the current position and everything that moves
/// with it: bundle stack, active video and pending cleanup.
pub struct NavigationEngine<R: Renderer> {
    slides: Vec<Slide>,
    current: usize,
    animating: bool,
    in_flight: Option<Transition>,
    stack: BundleStack,
    video: VideoActivationTracker,
    scheduler: Scheduler<EngineTask>,
    finish: Option<TaskHandle>,
    timings: TransitionTimings,
    generation: u64,
    renderer: R,
}

impl<R: Renderer> NavigationEngine<R> {
    /// Start at `current` (clamped into the deck) and bring video playback in
    /// line with it.
    pub fn new(
        slides: Vec<Slide>,
        current: usize,
        timings: TransitionTimings,
        max_depth: u8,
        renderer: R,
    ) -> Self {
        let current = current.min(slides.len().saturating_sub(1));
        let video = VideoActivationTracker::new(&slides);
        let mut engine = Self {
            slides,
            current,
            animating: false,
            in_flight: None,
            stack: BundleStack::new(max_depth),
            video,
            scheduler: Scheduler::new(),
            finish: None,
            timings,
            generation: 0,
            renderer,
        };
        if !engine.slides.is_empty() {
            engine.video.update(engine.current, &mut engine.renderer);
        }
        engine
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn stack(&self) -> &BundleStack {
        &self.stack
    }

    pub fn video(&self) -> &VideoActivationTracker {
        &self.video
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn timings(&self) -> &TransitionTimings {
        &self.timings
    }

    /// Current position as a `section/n` path.
    pub fn location(&self) -> Option<String> {
        format_location(&self.slides, self.current)
    }

    /// Handle a navigation request. Returns the transition if it was accepted.
    pub fn navigate(&mut self, intent: &Intent) -> Option<Transition> {
        if self.animating {
            tracing::debug!(?intent, "navigation ignored, transition in flight");
            return None;
        }
        let (target, direction, kind, action) = self.plan(intent)?;
        Some(self.execute(target, direction, kind, action))
    }

    fn plan(
        &self,
        intent: &Intent,
    ) -> Option<(usize, Direction, TransitionKind, Option<StackAction>)> {
        let current = self.slides.get(self.current)?;
        let planned = match intent {
            Intent::Horizontal(direction) => {
                let target = direction.step(self.current, self.slides.len())?;
                let (kind, action) =
                    classify(current, &self.slides[target], target, &self.stack);
                (target, *direction, kind, action)
            }
            Intent::Vertical(direction) => {
                let target = self.section_target(current.section_index, *direction)?;
                (target, *direction, TransitionKind::Section, Some(StackAction::Clear))
            }
            Intent::JumpToSection(key) => {
                let target = self.slides.iter().position(|s| &s.section_key == key)?;
                let direction = if target > self.current {
                    Direction::Next
                } else {
                    Direction::Prev
                };
                (target, direction, TransitionKind::Section, Some(StackAction::Clear))
            }
        };
        if planned.0 == self.current || planned.0 >= self.slides.len() {
            return None;
        }
        Some(planned)
    }

    /// First slide of the nearest section with visible slides.
    fn section_target(&self, section_index: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Next => self
                .slides
                .iter()
                .position(|s| s.section_index > section_index),
            Direction::Prev => {
                let previous = self
                    .slides
                    .iter()
                    .rev()
                    .find(|s| s.section_index < section_index)?
                    .section_index;
                self.slides
                    .iter()
                    .position(|s| s.section_index == previous)
            }
        }
    }

    fn execute(
        &mut self,
        target: usize,
        direction: Direction,
        kind: TransitionKind,
        action: Option<StackAction>,
    ) -> Transition {
        self.animating = true;
        let from = self.current;

        if action == Some(StackAction::Clear) {
            let cleared = self.stack.clear();
            self.fade_out(cleared);
        }
        if let Some(cleared) = self.stack.enter_bundle(self.slides[target].bundle_id()) {
            self.fade_out(cleared);
        }

        self.video.update(target, &mut self.renderer);

        match action {
            Some(StackAction::Push) => {
                let depths = self.stack.push(from);
                self.renderer.stack_depths(&depths);
            }
            Some(StackAction::Pop) => {
                if self.stack.top() == Some(target) {
                    self.stack.pop();
                } else {
                    self.stack.remove(target);
                }
                self.renderer.unstack(target);
                self.renderer.stack_depths(&self.stack.depths());
            }
            Some(StackAction::Clear) | None => {}
        }

        let transition = Transition {
            from,
            to: target,
            direction,
            kind,
            stack_action: action,
            duration_ms: kind.duration_ms(&self.timings),
            settle_ms: kind.settle_ms(&self.timings),
            cues: cues(kind, action, direction),
        };
        self.renderer.transition(&transition);

        self.current = target;
        tracing::debug!(
            from,
            to = target,
            kind = %kind,
            stack = ?action,
            "navigated"
        );

        self.finish = Some(self.scheduler.schedule(
            transition.total_ms(),
            EngineTask::FinishTransition {
                generation: self.generation,
            },
        ));
        self.in_flight = Some(transition.clone());

        if let Some(location) = self.location() {
            self.renderer.location_changed(&location);
        }
        transition
    }

    fn fade_out(&mut self, slides: Vec<usize>) {
        if slides.is_empty() {
            return;
        }
        self.renderer.stack_fade_out(&slides);
        self.scheduler.schedule(
            self.timings.stack_fade,
            EngineTask::StackFadeComplete {
                generation: self.generation,
                slides,
            },
        );
    }

    /// Run every scheduled cleanup due by `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(task) = self.scheduler.pop_next_due(now_ms) {
            self.run(task);
        }
    }

    /// Run all pending cleanup, moving the clock as far as needed.
    pub fn settle(&mut self) {
        while let Some(due) = self.scheduler.next_deadline() {
            self.advance(due);
        }
    }

    fn run(&mut self, task: EngineTask) {
        match task {
            EngineTask::FinishTransition { generation } => {
                if generation != self.generation {
                    return;
                }
                self.finish = None;
                self.animating = false;
                if let Some(transition) = self.in_flight.take() {
                    self.renderer.transition_finished(&transition);
                }
            }
            EngineTask::StackFadeComplete { generation, slides } => {
                if generation != self.generation {
                    return;
                }
                // Slides stacked again or active since the fade began keep
                // their markings.
                let faded: Vec<usize> = slides
                    .into_iter()
                    .filter(|&s| s != self.current && !self.stack.contains(s))
                    .collect();
                if !faded.is_empty() {
                    self.renderer.stack_fade_complete(&faded);
                }
            }
        }
    }

    /// Swap in a rebuilt visible deck positioned at `current`.
    ///
    /// Clears the stack, stops the active video, and abandons any transition
    /// in flight.
    pub fn replace_slides(&mut self, slides: Vec<Slide>, current: usize) {
        self.video.stop_all(&mut self.renderer);
        let cleared = self.stack.clear();
        if !cleared.is_empty() {
            self.renderer.stack_fade_complete(&cleared);
        }
        if let Some(handle) = self.finish.take() {
            self.scheduler.cancel(handle);
        }
        self.generation += 1;
        self.animating = false;
        self.in_flight = None;

        self.current = current.min(slides.len().saturating_sub(1));
        self.slides = slides;
        self.video.rebuild(&self.slides);
        self.renderer.deck_replaced(self.slides.len(), self.current);
        if !self.slides.is_empty() {
            self.video.update(self.current, &mut self.renderer);
        }
        if let Some(location) = self.location() {
            self.renderer.location_changed(&location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Recorder, RenderEvent};
    use crate::test_helpers::SlideBuilder;

    fn engine(slides: Vec<Slide>) -> NavigationEngine<Recorder> {
        NavigationEngine::new(slides, 0, TransitionTimings::default(), 3, Recorder::new())
    }

    fn next(engine: &mut NavigationEngine<Recorder>) -> Option<Transition> {
        let t = engine.navigate(&Intent::Horizontal(Direction::Next));
        engine.settle();
        t
    }

    fn prev(engine: &mut NavigationEngine<Recorder>) -> Option<Transition> {
        let t = engine.navigate(&Intent::Horizontal(Direction::Prev));
        engine.settle();
        t
    }

    /// Three sections, two plain one-image posts each.
    fn three_sections() -> Vec<Slide> {
        (0..6)
            .map(|g| {
                SlideBuilder::new(g)
                    .section(g / 2)
                    .post(g % 2)
                    .post_range(g, g)
                    .build()
            })
            .collect()
    }

    /// Bundle (0,0): P0 = [a0, a1], P1 = [b0]; then a plain post in section 1.
    fn bundle() -> Vec<Slide> {
        vec![
            SlideBuilder::new(0).group(0).post(0).post_range(0, 1).build(),
            SlideBuilder::new(1).group(0).post(0).asset_index(1).post_range(0, 1).build(),
            SlideBuilder::new(2).group(0).post(1).post_range(2, 2).build(),
            SlideBuilder::new(3).section(1).post(0).post_range(3, 3).build(),
        ]
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn plain_posts_are_between_posts_without_stack() {
        let mut e = engine(three_sections());
        let t = next(&mut e).unwrap();
        assert_eq!(t.kind, TransitionKind::BetweenPosts);
        assert_eq!(t.stack_action, None);
        assert_eq!(t.settle_ms, 25);
    }

    #[test]
    fn crossing_section_horizontally() {
        let mut e = engine(three_sections());
        next(&mut e);
        let t = next(&mut e).unwrap();
        assert_eq!(t.kind, TransitionKind::SectionHorizontal);
        assert_eq!(t.stack_action, Some(StackAction::Clear));
        assert_eq!(t.duration_ms, 400);
        assert!(t.cues.contains(&Cue::AxisHint(Direction::Next)));
    }

    #[test]
    fn between_groups_clears() {
        let slides = vec![
            SlideBuilder::new(0).group(0).post(0).build(),
            SlideBuilder::new(1).group(1).post(0).build(),
        ];
        let mut e = engine(slides);
        let t = next(&mut e).unwrap();
        assert_eq!(t.kind, TransitionKind::BetweenGroups);
        assert_eq!(t.stack_action, Some(StackAction::Clear));
        assert_eq!(t.duration_ms, 250);
        assert_eq!(
            t.cues,
            vec![Cue::EdgeFlash(Direction::Next), Cue::Sheen(Direction::Next), Cue::ScaleEnter]
        );
    }

    // =========================================================================
    // Bundle stack
    // =========================================================================

    #[test]
    fn bundle_push_then_pop() {
        let mut e = engine(bundle());

        let t = next(&mut e).unwrap();
        assert_eq!(t.kind, TransitionKind::WithinPost);
        assert!(e.stack().is_empty());

        let t = next(&mut e).unwrap();
        assert_eq!(t.kind, TransitionKind::BetweenPosts);
        assert_eq!(t.stack_action, Some(StackAction::Push));
        assert_eq!(e.stack().entries(), &[1]);

        let t = prev(&mut e).unwrap();
        assert_eq!(t.stack_action, Some(StackAction::Pop));
        assert!(e.stack().is_empty());
        assert_eq!(e.current_index(), 1);
        assert!(e.renderer().events.contains(&RenderEvent::Unstack(1)));
    }

    #[test]
    fn entering_bundle_backwards_builds_stack() {
        let mut e = NavigationEngine::new(
            bundle(),
            2,
            TransitionTimings::default(),
            3,
            Recorder::new(),
        );
        let t = prev(&mut e).unwrap();
        assert_eq!(t.stack_action, Some(StackAction::Push));
        assert_eq!(e.stack().entries(), &[2]);
    }

    #[test]
    fn leaving_section_clears_stack_and_fades() {
        let mut e = engine(bundle());
        next(&mut e);
        next(&mut e);
        assert_eq!(e.stack().len(), 1);
        let t = next(&mut e).unwrap();
        assert_eq!(t.kind, TransitionKind::SectionHorizontal);
        assert!(e.stack().is_empty());
        let events = &e.renderer().events;
        assert!(events.contains(&RenderEvent::StackFadeOut(vec![1])));
        assert!(events.contains(&RenderEvent::StackFadeComplete(vec![1])));
    }

    #[test]
    fn stack_never_holds_current_slide() {
        let mut e = engine(bundle());
        for step in [true, true, false, true, false, false, true, true, true] {
            if step { next(&mut e) } else { prev(&mut e) };
            assert!(!e.stack().contains(e.current_index()));
        }
    }

    // =========================================================================
    // Guards
    // =========================================================================

    #[test]
    fn navigation_while_animating_is_dropped() {
        let mut e = engine(three_sections());
        assert!(e.navigate(&Intent::Horizontal(Direction::Next)).is_some());
        assert!(e.is_animating());
        assert!(e.navigate(&Intent::Horizontal(Direction::Next)).is_none());
        assert_eq!(e.current_index(), 1);

        e.advance(e.now_ms() + 150 + 25);
        assert!(!e.is_animating());
        assert!(e.navigate(&Intent::Horizontal(Direction::Next)).is_some());
    }

    #[test]
    fn lock_holds_after_an_idle_stretch() {
        let mut e = engine(three_sections());
        e.advance(10_000);
        assert_eq!(e.now_ms(), 10_000);
        e.navigate(&Intent::Horizontal(Direction::Next)).unwrap();
        e.advance(10_016);
        assert!(e.is_animating());
        assert!(e.navigate(&Intent::Horizontal(Direction::Next)).is_none());
        e.advance(10_175);
        assert!(!e.is_animating());
    }

    #[test]
    fn animation_ends_only_after_duration_and_settle() {
        let mut e = engine(three_sections());
        e.navigate(&Intent::Horizontal(Direction::Next));
        e.advance(150);
        assert!(e.is_animating());
        e.advance(175);
        assert!(!e.is_animating());
    }

    #[test]
    fn edges_are_clamped_not_wrapped() {
        let mut e = engine(three_sections());
        assert!(prev(&mut e).is_none());
        for _ in 0..10 {
            next(&mut e);
        }
        assert_eq!(e.current_index(), 5);
        assert!(next(&mut e).is_none());
    }

    #[test]
    fn empty_deck_ignores_everything() {
        let mut e = engine(Vec::new());
        assert!(next(&mut e).is_none());
        assert!(e.navigate(&Intent::Vertical(Direction::Next)).is_none());
        assert!(e.navigate(&Intent::JumpToSection("s0".into())).is_none());
    }

    // =========================================================================
    // Vertical and jump
    // =========================================================================

    #[test]
    fn vertical_goes_to_first_slide_of_next_section() {
        let mut e = NavigationEngine::new(
            three_sections(),
            1,
            TransitionTimings::default(),
            3,
            Recorder::new(),
        );
        let t = e.navigate(&Intent::Vertical(Direction::Next)).unwrap();
        assert_eq!(t.to, 2);
        assert_eq!(t.kind, TransitionKind::Section);
        assert_eq!(t.cues, vec![Cue::DepthSwap, Cue::SectionOverlay, Cue::TabPulse]);
    }

    #[test]
    fn vertical_prev_goes_to_first_slide_of_previous_section() {
        let mut e = NavigationEngine::new(
            three_sections(),
            5,
            TransitionTimings::default(),
            3,
            Recorder::new(),
        );
        let t = e.navigate(&Intent::Vertical(Direction::Prev)).unwrap();
        assert_eq!(t.to, 2);
    }

    #[test]
    fn vertical_skips_sections_without_visible_slides() {
        let slides = vec![
            SlideBuilder::new(0).section(0).build(),
            SlideBuilder::new(5).section(2).build(),
        ];
        let mut e = engine(slides);
        let t = e.navigate(&Intent::Vertical(Direction::Next)).unwrap();
        assert_eq!(t.to, 1);
        e.settle();
        assert!(e.navigate(&Intent::Vertical(Direction::Next)).is_none());
    }

    #[test]
    fn jump_to_section_by_key() {
        let mut e = engine(three_sections());
        let t = e.navigate(&Intent::JumpToSection("s2".into())).unwrap();
        assert_eq!(t.to, 4);
        assert_eq!(t.direction, Direction::Next);
        e.settle();
        let t = e.navigate(&Intent::JumpToSection("s0".into())).unwrap();
        assert_eq!(t.direction, Direction::Prev);
        e.settle();
        assert!(e.navigate(&Intent::JumpToSection("s0".into())).is_none());
        assert!(e.navigate(&Intent::JumpToSection("nope".into())).is_none());
    }

    // =========================================================================
    // Renderer side effects
    // =========================================================================

    #[test]
    fn accepted_navigation_reports_location() {
        let mut e = engine(three_sections());
        next(&mut e);
        assert!(e.renderer().events.contains(&RenderEvent::Location("s0/1".into())));
    }

    #[test]
    fn replace_slides_resets_state_and_ignores_stale_cleanup() {
        let mut e = engine(bundle());
        next(&mut e);
        e.navigate(&Intent::Horizontal(Direction::Next));
        assert!(e.is_animating());

        e.replace_slides(three_sections(), 3);
        assert!(!e.is_animating());
        assert!(e.stack().is_empty());
        assert_eq!(e.current_index(), 3);

        e.renderer_mut().take();
        e.settle();
        assert!(e.renderer().events.is_empty(), "stale tasks must not fire");
    }

    #[test]
    fn replace_slides_clamps_position() {
        let mut e = engine(three_sections());
        e.replace_slides(bundle(), 99);
        assert_eq!(e.current_index(), 3);
    }
}
