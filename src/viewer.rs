//! The viewer controller: one value owning all application state.
//!
//! [`Viewer::open`] runs the startup sequence:
//!
//! 1. Build the full deck, tag index and section tabs from the newsletter.
//! 2. Restore mode and selected tags from the store.
//! 3. Filter the deck and seed the position from the initial location
//!    (falling back to the first slide).
//! 4. Start the chrome session (onboarding on first visit).
//!
//! After that every input goes through [`Viewer::handle`] (or the key/touch
//! shortcuts), and time moves only through [`Viewer::advance`].
//!
//! Mode and tag changes rebuild the visible deck and re-locate the current
//! slide by its stable global index. Persisting those changes is best effort:
//! a failing store is logged and the session carries on.

use crate::chrome::{self, Chrome, SectionTab};
use crate::config::ViewerConfig;
use crate::data::Newsletter;
use crate::filter::{self, ViewMode};
use crate::input::{Command, Key, Touch, command_for_key, command_for_touch};
use crate::location::parse_location;
use crate::navigation::{Intent, NavigationEngine, Transition};
use crate::persist::{self, StoreError, ViewStore};
use crate::render::Renderer;
use crate::slides;
use crate::tags::{TagChip, TagIndex};
use crate::types::Slide;
use std::collections::{BTreeMap, BTreeSet};

pub struct Viewer<R: Renderer, S: ViewStore> {
    config: ViewerConfig,
    title: Option<String>,
    all: Vec<Slide>,
    tags: TagIndex,
    tabs: Vec<SectionTab>,
    mode: ViewMode,
    selected: BTreeSet<String>,
    engine: NavigationEngine<R>,
    chrome: Chrome,
    store: S,
    placeholders: BTreeSet<usize>,
}

impl<R: Renderer, S: ViewStore> Viewer<R, S> {
    pub fn open(
        newsletter: &Newsletter,
        config: ViewerConfig,
        renderer: R,
        mut store: S,
        initial_location: Option<&str>,
    ) -> Result<Self, StoreError> {
        let all = slides::build(newsletter, &config);
        let tags = TagIndex::build(&all, &newsletter.new_tags);
        let tabs = chrome::section_tabs(&all, &config.sections.order);

        let state = persist::restore_state(&store, &config.storage)?;
        let visible = filter::apply(&all, state.mode, &state.selected_tags);
        let current = initial_location
            .and_then(|path| {
                let found = parse_location(&visible, path);
                if found.is_none() {
                    tracing::debug!(path, "ignoring unmatched location");
                }
                found
            })
            .unwrap_or(0);

        tracing::info!(
            slides = all.len(),
            visible = visible.len(),
            tags = tags.all.len(),
            mode = %state.mode,
            "viewer opened"
        );

        let engine = NavigationEngine::new(
            visible,
            current,
            config.transitions.clone(),
            config.stack.max_depth,
            renderer,
        );

        let mut chrome = Chrome::new(config.timing.clone());
        chrome.start_session(state.onboarded);
        if !state.onboarded {
            persist_or_warn(persist::mark_onboarded(&mut store, &config.storage));
        }

        Ok(Self {
            config,
            title: newsletter.title.clone(),
            all,
            tags,
            tabs,
            mode: state.mode,
            selected: state.selected_tags,
            engine,
            chrome,
            store,
            placeholders: BTreeSet::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn navigate(&mut self, intent: &Intent) -> Option<Transition> {
        let transition = self.engine.navigate(intent)?;
        if transition.kind.crosses_section() {
            self.chrome.show_tab_bar(false);
        }
        Some(transition)
    }

    /// Apply one command. Returns the transition if the command navigated.
    pub fn handle(&mut self, command: &Command) -> Option<Transition> {
        match command {
            Command::Navigate(intent) => return self.navigate(intent),
            Command::ToggleMode => self.toggle_mode(),
            Command::ToggleTagPanel => self.toggle_tag_panel(),
            Command::ShowOnboarding => self.chrome.show_onboarding(),
            Command::Escape => {
                if self.chrome.tag_panel_open() {
                    self.close_tag_panel();
                } else {
                    self.chrome.hide_tab_bar();
                }
            }
            Command::ToggleTabBar => self.chrome.toggle_tab_bar(),
        }
        None
    }

    pub fn handle_key(&mut self, key: Key) -> Option<Transition> {
        let command = command_for_key(key)?;
        self.handle(&command)
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> Option<Transition> {
        let command = command_for_touch(touch, &self.config.input)?;
        self.handle(&command)
    }

    /// Run every timer (transition cleanup, stack fades, chrome) due by
    /// `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        self.engine.advance(now_ms);
        self.chrome.advance(now_ms);
    }

    /// Let the transition in flight (and any stack fade) finish.
    pub fn settle(&mut self) {
        self.engine.settle();
        self.chrome.advance(self.engine.now_ms());
    }

    pub fn now_ms(&self) -> u64 {
        self.engine.now_ms().max(self.chrome.now_ms())
    }

    // -------------------------------------------------------------------------
    // Mode and tags
    // -------------------------------------------------------------------------

    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        persist_or_warn(persist::save_mode(&mut self.store, &self.config.storage, mode));
        tracing::info!(%mode, "view mode changed");
        self.apply_filter();
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Flip selection of `tag`. Takes effect when the tag panel closes.
    /// Returns whether the tag is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        if self.selected.remove(&tag) {
            false
        } else {
            self.selected.insert(tag);
            true
        }
    }

    pub fn toggle_tag_panel(&mut self) {
        if self.chrome.tag_panel_open() {
            self.close_tag_panel();
        } else {
            self.chrome.open_tag_panel();
        }
    }

    /// Close the tag panel, committing the selection: persist it and, in
    /// personalized mode, re-filter the deck.
    pub fn close_tag_panel(&mut self) {
        if !self.chrome.tag_panel_open() {
            return;
        }
        self.chrome.close_tag_panel();
        persist_or_warn(persist::save_selected_tags(
            &mut self.store,
            &self.config.storage,
            &self.selected,
        ));
        if self.mode == ViewMode::Personalized {
            self.apply_filter();
        }
    }

    /// Rebuild the visible deck for the current mode and tags, staying on the
    /// same slide when it is still visible.
    fn apply_filter(&mut self) {
        let global = self.engine.current_slide().map(|s| s.global_index);
        let visible = filter::apply(&self.all, self.mode, &self.selected);
        let current = global.map_or(0, |g| filter::relocate(&visible, g));
        tracing::debug!(visible = visible.len(), current, "visible deck rebuilt");
        self.engine.replace_slides(visible, current);
        self.redraw_placeholders();
    }

    // -------------------------------------------------------------------------
    // Assets
    // -------------------------------------------------------------------------

    /// Record that the asset of the slide with `global_index` failed to load.
    /// Only that slide is affected; it shows a placeholder from now on.
    pub fn report_asset_failure(&mut self, global_index: usize) {
        if !self.placeholders.insert(global_index) {
            return;
        }
        tracing::warn!(global_index, "asset failed to load, showing placeholder");
        if let Some(index) = self.visible_index_of(global_index) {
            self.engine.renderer_mut().placeholder(index);
        }
    }

    pub fn has_placeholder(&self, global_index: usize) -> bool {
        self.placeholders.contains(&global_index)
    }

    fn redraw_placeholders(&mut self) {
        let indices: Vec<usize> = self
            .placeholders
            .iter()
            .filter_map(|&g| self.visible_index_of(g))
            .collect();
        for index in indices {
            self.engine.renderer_mut().placeholder(index);
        }
    }

    fn visible_index_of(&self, global_index: usize) -> Option<usize> {
        self.engine
            .slides()
            .binary_search_by_key(&global_index, |s| s.global_index)
            .ok()
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn all_slides(&self) -> &[Slide] {
        &self.all
    }

    pub fn visible_slides(&self) -> &[Slide] {
        self.engine.slides()
    }

    pub fn current_index(&self) -> usize {
        self.engine.current_index()
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.engine.current_slide()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    pub fn tag_chips(&self) -> Vec<TagChip> {
        self.tags.chips(&self.selected, self.current_slide())
    }

    pub fn tabs(&self) -> &[SectionTab] {
        &self.tabs
    }

    /// Key of the section the current slide belongs to.
    pub fn active_tab(&self) -> Option<&str> {
        self.current_slide().map(|s| s.section_key.as_str())
    }

    pub fn badges(&self) -> BTreeMap<String, usize> {
        chrome::tab_badges(self.visible_slides())
    }

    pub fn progress(&self) -> f64 {
        chrome::progress(self.current_index(), self.visible_slides().len())
    }

    pub fn progress_sections(&self) -> Vec<(String, f64)> {
        chrome::progress_sections(self.visible_slides(), &self.tabs)
    }

    pub fn location(&self) -> Option<String> {
        self.engine.location()
    }

    pub fn engine(&self) -> &NavigationEngine<R> {
        &self.engine
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut Chrome {
        &mut self.chrome
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        self.engine.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.engine.renderer_mut()
    }
}

fn persist_or_warn(result: Result<(), StoreError>) {
    if let Err(err) = result {
        tracing::warn!(%err, "failed to persist view state");
    }
}
