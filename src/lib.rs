//! # newsdeck
//!
//! A slide viewer for weekly newsletters. A newsletter is a YAML document of
//! sections, posts and bundles of posts; every asset becomes one slide, and
//! the reader pages through them with the keyboard or swipes.
//!
//! # Architecture: Deck → Filter → Engine
//!
//! ```text
//! 1. Load     newsletter.yaml  →  Newsletter      (serde document model)
//! 2. Index    Newsletter       →  Vec<Slide>      (flattened deck + exit slide)
//! 3. Filter   deck + mode/tags →  visible slides  (pure, never empty)
//! 4. Navigate intents          →  transitions     (state machine + renderer)
//! ```
//!
//! Stages 1–3 are pure functions, so most of the behaviour is testable
//! without a clock or a screen. Stage 4 owns all mutable state and talks to
//! the outside world through two seams: the [`render::Renderer`] trait for
//! drawing and video playback, and the [`persist::ViewStore`] trait for the
//! persisted view state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`data`] | Newsletter document model, YAML/JSON loading |
//! | [`types`] | Shared slide types (`Slide`, `Asset`, `Media`, `BundleId`) |
//! | [`slides`] | Slide index: flattens the newsletter into the deck |
//! | [`tags`] | Tag universe, new tags, tag cloud chips |
//! | [`filter`] | View mode and the visibility filter |
//! | [`video`] | Video activation ranges and the playback tracker |
//! | [`stack`] | Bundle stack with depth tiers |
//! | [`schedule`] | Cancelable deferred tasks on an external clock |
//! | [`render`] | Renderer trait, recorder, playback errors |
//! | [`navigation`] | Navigation engine and transition classification |
//! | [`location`] | `section/n` position paths |
//! | [`persist`] | View state storage: mode, tags, onboarding flag |
//! | [`chrome`] | Tab bar, onboarding, tabs, badges, progress |
//! | [`input`] | Keys and touch gestures to commands |
//! | [`viewer`] | The controller owning all state |
//! | [`config`] | `config.toml` loading, validation, merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Time Is an Input
//!
//! Transition cleanup, stack fades, tab bar auto-hide and onboarding all
//! happen "later". Nothing here reads a clock: the owner calls
//! [`viewer::Viewer::advance`] with the current time in milliseconds and due
//! tasks run then. A browser front end feeds it from `requestAnimationFrame`;
//! tests and the `play` command feed it whatever they like.
//!
//! ## One Transition at a Time
//!
//! Navigation requests arriving while a transition is animating are dropped,
//! not queued. Holding an arrow key therefore advances at the pace of the
//! animations instead of building a backlog.
//!
//! ## Stable Global Indices
//!
//! Filtering produces a new visible deck, but every slide keeps the index it
//! had in the full deck. Mode and tag changes re-locate the reader by that
//! index, so they stay on the same slide (or the next visible one).

pub mod chrome;
pub mod config;
pub mod data;
pub mod filter;
pub mod input;
pub mod location;
pub mod navigation;
pub mod output;
pub mod persist;
pub mod render;
pub mod schedule;
pub mod slides;
pub mod stack;
pub mod tags;
pub mod types;
pub mod video;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
