//! Renderer seam: everything the viewer asks the presentation layer to do.
//!
//! The core never touches pixels. It emits transition intents, stack depth
//! updates, video commands and location changes through the [`Renderer`]
//! trait, so the same state machine can drive a browser front end, a terminal
//! transcript, or a test recorder.
//!
//! | Implementation | Use |
//! |---|---|
//! | [`Recorder`] | keeps every call as a [`RenderEvent`] (CLI `play`, tests) |
//! | [`NullRenderer`] | discards everything |
//!
//! Every method except [`Renderer::play_video`] and [`Renderer::transition`]
//! has a no-op default, so a front end only implements what it draws.

use crate::navigation::Transition;
use crate::stack::StackDepth;
use crate::video::VideoLayer;
use thiserror::Error;

/// A video refused to start (e.g. an autoplay policy). Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("playback rejected for slide {slide}: {reason}")]
pub struct PlaybackRejected {
    pub slide: usize,
    pub reason: String,
}

pub trait Renderer {
    /// Animate from `transition.from` to `transition.to`.
    fn transition(&mut self, transition: &Transition);

    /// Transient transition markers can be removed.
    fn transition_finished(&mut self, _transition: &Transition) {}

    /// Stacked slides and their depth tiers, bottom first.
    fn stack_depths(&mut self, _depths: &[StackDepth]) {}

    /// A stacked slide becomes active again in place.
    fn unstack(&mut self, _slide: usize) {}

    /// Previously stacked slides start fading out.
    fn stack_fade_out(&mut self, _slides: &[usize]) {}

    /// Fade-out finished; drop stacked markings from these slides.
    fn stack_fade_complete(&mut self, _slides: &[usize]) {}

    /// Start (or resume) playback of the video on `slide`, with sound.
    fn play_video(&mut self, slide: usize) -> Result<(), PlaybackRejected>;

    /// Pause, rewind and demote the video on `slide`.
    fn stop_video(&mut self, _slide: usize) {}

    fn set_video_layer(&mut self, _slide: usize, _layer: VideoLayer) {}

    /// The visible deck was rebuilt (mode or tag change).
    fn deck_replaced(&mut self, _len: usize, _current: usize) {}

    /// Show a placeholder instead of the asset of `slide`.
    fn placeholder(&mut self, _slide: usize) {}

    /// The shareable position changed.
    fn location_changed(&mut self, _location: &str) {}
}

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Transition(Transition),
    TransitionFinished { from: usize, to: usize },
    StackDepths(Vec<StackDepth>),
    Unstack(usize),
    StackFadeOut(Vec<usize>),
    StackFadeComplete(Vec<usize>),
    PlayVideo(usize),
    StopVideo(usize),
    VideoLayer(usize, VideoLayer),
    DeckReplaced { len: usize, current: usize },
    Placeholder(usize),
    Location(String),
}

/// Renderer that records every call.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<RenderEvent>,
    /// Make every `play_video` call fail.
    pub reject_playback: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_playback() -> Self {
        Self {
            reject_playback: true,
            ..Self::default()
        }
    }

    /// Drain recorded events.
    pub fn take(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Renderer for Recorder {
    fn transition(&mut self, transition: &Transition) {
        self.events.push(RenderEvent::Transition(transition.clone()));
    }

    fn transition_finished(&mut self, transition: &Transition) {
        self.events.push(RenderEvent::TransitionFinished {
            from: transition.from,
            to: transition.to,
        });
    }

    fn stack_depths(&mut self, depths: &[StackDepth]) {
        self.events.push(RenderEvent::StackDepths(depths.to_vec()));
    }

    fn unstack(&mut self, slide: usize) {
        self.events.push(RenderEvent::Unstack(slide));
    }

    fn stack_fade_out(&mut self, slides: &[usize]) {
        self.events.push(RenderEvent::StackFadeOut(slides.to_vec()));
    }

    fn stack_fade_complete(&mut self, slides: &[usize]) {
        self.events.push(RenderEvent::StackFadeComplete(slides.to_vec()));
    }

    fn play_video(&mut self, slide: usize) -> Result<(), PlaybackRejected> {
        if self.reject_playback {
            return Err(PlaybackRejected {
                slide,
                reason: "autoplay blocked".to_string(),
            });
        }
        self.events.push(RenderEvent::PlayVideo(slide));
        Ok(())
    }

    fn stop_video(&mut self, slide: usize) {
        self.events.push(RenderEvent::StopVideo(slide));
    }

    fn set_video_layer(&mut self, slide: usize, layer: VideoLayer) {
        self.events.push(RenderEvent::VideoLayer(slide, layer));
    }

    fn deck_replaced(&mut self, len: usize, current: usize) {
        self.events.push(RenderEvent::DeckReplaced { len, current });
    }

    fn placeholder(&mut self, slide: usize) {
        self.events.push(RenderEvent::Placeholder(slide));
    }

    fn location_changed(&mut self, location: &str) {
        self.events.push(RenderEvent::Location(location.to_string()));
    }
}

/// Renderer that ignores every call and never rejects playback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn transition(&mut self, _transition: &Transition) {}

    fn play_video(&mut self, _slide: usize) -> Result<(), PlaybackRejected> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_calls_in_order() {
        let mut r = Recorder::new();
        r.stop_video(3);
        r.play_video(4).unwrap();
        r.location_changed("news/1");
        assert_eq!(
            r.take(),
            vec![
                RenderEvent::StopVideo(3),
                RenderEvent::PlayVideo(4),
                RenderEvent::Location("news/1".into()),
            ]
        );
        assert!(r.events.is_empty());
    }

    #[test]
    fn rejecting_recorder_fails_playback_without_recording() {
        let mut r = Recorder::rejecting_playback();
        let err = r.play_video(2).unwrap_err();
        assert_eq!(err.slide, 2);
        assert!(err.to_string().contains("autoplay"));
        assert!(r.events.is_empty());
    }

    #[test]
    fn null_renderer_accepts_playback() {
        assert!(NullRenderer.play_video(0).is_ok());
    }
}
