//! Video activation: which single video plays for a given position.
//!
//! A video is *active* over a contiguous range of visible slides:
//!
//! - The range starts at the video's own slide.
//! - It normally ends at the last visible slide of the video's post.
//! - If the video is the last one in its bundle, the range extends to the last
//!   slide of the bundle, so the bundle's final clip keeps playing behind the
//!   remaining static assets.
//!
//! For a slide that is itself a video, that video is active in the
//! foreground. Otherwise only the nearest preceding video is considered; if
//! the slide falls inside its range, it plays in the background behind the
//! slide, else nothing plays.
//!
//! Ranges are computed once per visible deck ([`ActivationRanges::build`]) and
//! looked up with a binary search over their start indices.

use crate::render::Renderer;
use crate::types::Slide;

/// Where the active video is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoLayer {
    /// The video is the current slide.
    Foreground,
    /// The video keeps playing behind a later, non-video slide.
    Background,
}

/// Inclusive activation range of one video slide, in visible indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationRange {
    pub start: usize,
    pub end: usize,
}

impl ActivationRange {
    pub fn covers(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// Precomputed activation ranges for one visible deck, sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationRanges {
    ranges: Vec<ActivationRange>,
    is_video: Vec<bool>,
}

impl ActivationRanges {
    pub fn build(slides: &[Slide]) -> Self {
        let is_video: Vec<bool> = slides.iter().map(Slide::is_video).collect();
        let ranges = slides
            .iter()
            .enumerate()
            .filter(|(_, slide)| slide.is_video())
            .map(|(start, slide)| ActivationRange {
                start,
                end: range_end(slides, start, slide),
            })
            .collect();
        Self { ranges, is_video }
    }

    pub fn ranges(&self) -> &[ActivationRange] {
        &self.ranges
    }

    /// The video that should be playing when `index` is the current slide.
    pub fn find_active_video(&self, index: usize) -> Option<usize> {
        if *self.is_video.get(index)? {
            return Some(index);
        }
        let preceding = self.ranges.partition_point(|r| r.start < index);
        let nearest = self.ranges[..preceding].last()?;
        nearest.covers(index).then_some(nearest.start)
    }
}

fn range_end(slides: &[Slide], start: usize, video: &Slide) -> usize {
    let post_end = post_end(slides, start, video);
    if video.is_bundled() && is_last_video_in_bundle(slides, start, video) {
        bundle_end(slides, start, video)
    } else {
        post_end
    }
}

/// Last visible index belonging to the video's post: `post_end_index`
/// projected from global into visible indexing.
fn post_end(slides: &[Slide], start: usize, video: &Slide) -> usize {
    let after = slides[start..].partition_point(|s| s.global_index <= video.post_end_index);
    start + after.saturating_sub(1)
}

fn is_last_video_in_bundle(slides: &[Slide], start: usize, video: &Slide) -> bool {
    !slides[start + 1..]
        .iter()
        .take_while(|s| s.same_group(video))
        .any(Slide::is_video)
}

fn bundle_end(slides: &[Slide], start: usize, video: &Slide) -> usize {
    start
        + slides[start + 1..]
            .iter()
            .take_while(|s| s.same_group(video))
            .count()
}

/// Tracks the single active video and drives playback through the renderer.
#[derive(Debug, Clone, Default)]
pub struct VideoActivationTracker {
    ranges: ActivationRanges,
    active: Option<usize>,
    layer: Option<VideoLayer>,
    playing: bool,
}

impl VideoActivationTracker {
    pub fn new(slides: &[Slide]) -> Self {
        Self {
            ranges: ActivationRanges::build(slides),
            ..Self::default()
        }
    }

    /// Recompute ranges for a new visible deck. The caller is responsible for
    /// stopping the previously active video first (see [`Self::stop_all`]).
    pub fn rebuild(&mut self, slides: &[Slide]) {
        self.ranges = ActivationRanges::build(slides);
        self.active = None;
        self.layer = None;
        self.playing = false;
    }

    pub fn find_active_video(&self, index: usize) -> Option<usize> {
        self.ranges.find_active_video(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn layer(&self) -> Option<VideoLayer> {
        self.layer
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn ranges(&self) -> &ActivationRanges {
        &self.ranges
    }

    /// Bring playback in line with `target` becoming the current slide.
    pub fn update<R: Renderer + ?Sized>(&mut self, target: usize, renderer: &mut R) {
        let next = self.find_active_video(target);

        if let Some(previous) = self.active
            && Some(previous) != next
        {
            renderer.stop_video(previous);
            self.playing = false;
            self.layer = None;
        }
        self.active = next;

        let Some(video) = next else {
            return;
        };
        let layer = if video == target {
            VideoLayer::Foreground
        } else {
            VideoLayer::Background
        };
        if self.layer != Some(layer) {
            renderer.set_video_layer(video, layer);
            self.layer = Some(layer);
        }
        if !self.playing {
            match renderer.play_video(video) {
                Ok(()) => self.playing = true,
                Err(err) => tracing::debug!(video, %err, "video playback rejected"),
            }
        }
    }

    /// Stop whatever is playing.
    pub fn stop_all<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(previous) = self.active.take() {
            renderer.stop_video(previous);
        }
        self.layer = None;
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Recorder, RenderEvent};
    use crate::test_helpers::SlideBuilder;

    /// One 5-asset standalone post whose 3rd asset (index 2) is a video,
    /// followed by a one-asset post.
    fn single_post_deck() -> Vec<Slide> {
        let mut slides: Vec<Slide> = (0..5)
            .map(|i| {
                let b = SlideBuilder::new(i).post(0).asset_index(i).post_range(0, 4);
                if i == 2 { b.video().build() } else { b.build() }
            })
            .collect();
        slides.push(SlideBuilder::new(5).post(1).post_range(5, 5).build());
        slides
    }

    #[test]
    fn video_slide_is_its_own_active_video() {
        let ranges = ActivationRanges::build(&single_post_deck());
        assert_eq!(ranges.find_active_video(2), Some(2));
    }

    #[test]
    fn video_covers_rest_of_post() {
        let ranges = ActivationRanges::build(&single_post_deck());
        assert_eq!(ranges.find_active_video(3), Some(2));
        assert_eq!(ranges.find_active_video(4), Some(2));
        assert_eq!(ranges.find_active_video(5), None);
    }

    #[test]
    fn slides_before_video_have_none() {
        let ranges = ActivationRanges::build(&single_post_deck());
        assert_eq!(ranges.find_active_video(0), None);
        assert_eq!(ranges.find_active_video(1), None);
        assert_eq!(ranges.find_active_video(99), None);
    }

    /// Bundle (0,1): post 0 = [video, image], post 1 = [image, image];
    /// then a standalone post.
    fn bundle_deck() -> Vec<Slide> {
        vec![
            SlideBuilder::new(0).group(1).post(0).post_range(0, 1).video().build(),
            SlideBuilder::new(1).group(1).post(0).asset_index(1).post_range(0, 1).build(),
            SlideBuilder::new(2).group(1).post(1).post_range(2, 3).build(),
            SlideBuilder::new(3).group(1).post(1).asset_index(1).post_range(2, 3).build(),
            SlideBuilder::new(4).post(2).post_range(4, 4).build(),
        ]
    }

    #[test]
    fn last_video_in_bundle_extends_to_bundle_end() {
        let ranges = ActivationRanges::build(&bundle_deck());
        assert_eq!(ranges.ranges(), &[ActivationRange { start: 0, end: 3 }]);
        assert_eq!(ranges.find_active_video(3), Some(0));
        assert_eq!(ranges.find_active_video(4), None);
    }

    #[test]
    fn earlier_video_in_bundle_stops_at_post_end() {
        let mut slides = bundle_deck();
        slides[2] = SlideBuilder::new(2).group(1).post(1).post_range(2, 3).video().build();
        let ranges = ActivationRanges::build(&slides);
        assert_eq!(
            ranges.ranges(),
            &[
                ActivationRange { start: 0, end: 1 },
                ActivationRange { start: 2, end: 3 },
            ]
        );
        assert_eq!(ranges.find_active_video(1), Some(0));
        assert_eq!(ranges.find_active_video(3), Some(2));
    }

    #[test]
    fn post_end_is_projected_into_filtered_deck() {
        // Filtered deck: global 0 (video, post 0..=3), global 3, global 7.
        let slides = vec![
            SlideBuilder::new(0).post(0).post_range(0, 3).video().build(),
            SlideBuilder::new(3).post(0).asset_index(3).post_range(0, 3).build(),
            SlideBuilder::new(7).post(1).post_range(7, 7).build(),
        ];
        let ranges = ActivationRanges::build(&slides);
        assert_eq!(ranges.ranges(), &[ActivationRange { start: 0, end: 1 }]);
    }

    #[test]
    fn only_nearest_preceding_video_counts() {
        // video A (post 0, 0..=0), video B (post 1, 1..=1), image in post 2
        let slides = vec![
            SlideBuilder::new(0).post(0).post_range(0, 0).video().build(),
            SlideBuilder::new(1).post(1).post_range(1, 1).video().build(),
            SlideBuilder::new(2).post(2).post_range(2, 2).build(),
        ];
        let ranges = ActivationRanges::build(&slides);
        assert_eq!(ranges.find_active_video(2), None);
    }

    #[test]
    fn update_plays_foreground_then_background() {
        let slides = single_post_deck();
        let mut tracker = VideoActivationTracker::new(&slides);
        let mut r = Recorder::default();

        tracker.update(2, &mut r);
        assert_eq!(tracker.active(), Some(2));
        assert_eq!(tracker.layer(), Some(VideoLayer::Foreground));

        tracker.update(3, &mut r);
        assert_eq!(tracker.layer(), Some(VideoLayer::Background));

        let plays = r.events.iter().filter(|e| matches!(e, RenderEvent::PlayVideo(2))).count();
        assert_eq!(plays, 1, "already playing video must not restart");
    }

    #[test]
    fn update_stops_previous_video_when_leaving_range() {
        let slides = single_post_deck();
        let mut tracker = VideoActivationTracker::new(&slides);
        let mut r = Recorder::default();
        tracker.update(2, &mut r);
        tracker.update(5, &mut r);
        assert_eq!(tracker.active(), None);
        assert!(r.events.contains(&RenderEvent::StopVideo(2)));
    }

    #[test]
    fn rejected_playback_is_swallowed() {
        let slides = single_post_deck();
        let mut tracker = VideoActivationTracker::new(&slides);
        let mut r = Recorder::rejecting_playback();
        tracker.update(2, &mut r);
        assert_eq!(tracker.active(), Some(2));
        assert!(!tracker.is_playing());
    }

    #[test]
    fn stop_all_resets_tracker() {
        let slides = single_post_deck();
        let mut tracker = VideoActivationTracker::new(&slides);
        let mut r = Recorder::default();
        tracker.update(3, &mut r);
        tracker.stop_all(&mut r);
        assert_eq!(tracker.active(), None);
        assert!(!tracker.is_playing());
        assert_eq!(r.events.last(), Some(&RenderEvent::StopVideo(2)));
    }
}
