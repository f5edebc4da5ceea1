//! Viewer chrome around the slides: section tabs, badges, progress, the
//! auto-hiding tab bar, the tag panel flag and the first-visit onboarding.
//!
//! ## Tab bar
//!
//! ```text
//! show(dimmed) ──► visible ──(auto-hide delay)──► hidden
//!                    │  ▲
//!        mouse enter │  │ mouse leave: dim, hide after the dimmed delay
//!                    ▼  │
//!                  hovered (never hides, never dims)
//! ```
//!
//! While the tag panel is open the bar stays visible and undimmed. All
//! delays run on a [`Scheduler`], so a newer event cancels the pending hide.
//!
//! ## Onboarding
//!
//! First visit: the intro shows for `onboarding` ms, fades for
//! `onboarding_fade` ms, then the tab bar appears dimmed. Return visits only
//! show the dimmed tab bar after `session_tab_bar` ms.

use crate::config::TimingConfig;
use crate::schedule::{Scheduler, TaskHandle};
use crate::types::Slide;
use std::collections::BTreeMap;

/// One section tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTab {
    pub key: String,
    pub name: String,
}

/// Tabs for every section with slides, in configured order. Sections missing
/// from `order` follow in order of appearance.
pub fn section_tabs(all: &[Slide], order: &[String]) -> Vec<SectionTab> {
    let mut tabs: Vec<SectionTab> = Vec::new();
    for slide in all {
        if !tabs.iter().any(|t| t.key == slide.section_key) {
            tabs.push(SectionTab {
                key: slide.section_key.clone(),
                name: slide.section_name.clone(),
            });
        }
    }
    // Stable sort keeps appearance order among unlisted sections.
    tabs.sort_by_key(|tab| {
        order
            .iter()
            .position(|key| key == &tab.key)
            .unwrap_or(order.len())
    });
    tabs
}

/// Visible slide count per section key.
pub fn tab_badges(visible: &[Slide]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for slide in visible {
        *counts.entry(slide.section_key.clone()).or_insert(0) += 1;
    }
    counts
}

/// Progress through the visible deck, in percent.
pub fn progress(current: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (current + 1) as f64 / len as f64 * 100.0
}

/// Share of the progress bar per section, in percent, following `tabs`.
/// Sections without visible slides are left out.
pub fn progress_sections(visible: &[Slide], tabs: &[SectionTab]) -> Vec<(String, f64)> {
    let counts = tab_badges(visible);
    let total = visible.len();
    tabs.iter()
        .filter_map(|tab| {
            let count = *counts.get(&tab.key)?;
            Some((tab.key.clone(), count as f64 / total as f64 * 100.0))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPhase {
    Hidden,
    Showing,
    Fading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChromeTask {
    HideTabBar,
    FadeOnboarding,
    HideOnboarding,
    SessionTabBar,
}

/// Snapshot of the tab bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabBarState {
    pub visible: bool,
    pub dimmed: bool,
    pub hovered: bool,
}

#[derive(Debug, Clone)]
pub struct Chrome {
    tab_bar: TabBarState,
    tag_panel_open: bool,
    onboarding: OnboardingPhase,
    pending_hide: Option<TaskHandle>,
    pending_onboarding: Option<TaskHandle>,
    timing: TimingConfig,
    scheduler: Scheduler<ChromeTask>,
}

impl Chrome {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            tab_bar: TabBarState::default(),
            tag_panel_open: false,
            onboarding: OnboardingPhase::Hidden,
            pending_hide: None,
            pending_onboarding: None,
            timing,
            scheduler: Scheduler::new(),
        }
    }

    pub fn tab_bar(&self) -> TabBarState {
        self.tab_bar
    }

    pub fn tag_panel_open(&self) -> bool {
        self.tag_panel_open
    }

    pub fn onboarding(&self) -> OnboardingPhase {
        self.onboarding
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    fn holds_tab_bar(&self) -> bool {
        self.tab_bar.hovered || self.tag_panel_open
    }

    fn cancel_hide(&mut self) {
        if let Some(handle) = self.pending_hide.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn schedule_hide(&mut self, delay_ms: u64) {
        self.cancel_hide();
        self.pending_hide = Some(self.scheduler.schedule(delay_ms, ChromeTask::HideTabBar));
    }

    pub fn show_tab_bar(&mut self, dimmed: bool) {
        self.cancel_hide();
        self.tab_bar.visible = true;
        self.tab_bar.dimmed = dimmed && !self.holds_tab_bar();
        if !self.holds_tab_bar() {
            let delay = if dimmed {
                self.timing.tab_bar_dimmed
            } else {
                self.timing.tab_bar_auto_hide
            };
            self.schedule_hide(delay);
        }
    }

    /// Hide the tab bar unless it is hovered or the tag panel is open.
    pub fn hide_tab_bar(&mut self) {
        if self.holds_tab_bar() {
            return;
        }
        self.tab_bar.visible = false;
        self.tab_bar.dimmed = false;
    }

    pub fn toggle_tab_bar(&mut self) {
        if self.tab_bar.visible {
            self.hide_tab_bar();
        } else {
            self.show_tab_bar(false);
        }
    }

    pub fn mouse_enter(&mut self) {
        self.tab_bar.hovered = true;
        self.cancel_hide();
        self.tab_bar.dimmed = false;
    }

    pub fn mouse_leave(&mut self) {
        self.tab_bar.hovered = false;
        if self.tag_panel_open {
            return;
        }
        self.tab_bar.dimmed = true;
        self.schedule_hide(self.timing.tab_bar_dimmed);
    }

    pub fn open_tag_panel(&mut self) {
        self.tag_panel_open = true;
        self.show_tab_bar(false);
    }

    pub fn close_tag_panel(&mut self) {
        if !self.tag_panel_open {
            return;
        }
        self.tag_panel_open = false;
        if !self.tab_bar.hovered {
            self.schedule_hide(self.timing.tab_bar_auto_hide);
        }
    }

    /// First visit shows onboarding; return visits get a dimmed tab bar.
    pub fn start_session(&mut self, onboarded: bool) {
        if onboarded {
            self.scheduler
                .schedule(self.timing.session_tab_bar, ChromeTask::SessionTabBar);
        } else {
            self.show_onboarding();
        }
    }

    pub fn show_onboarding(&mut self) {
        if let Some(handle) = self.pending_onboarding.take() {
            self.scheduler.cancel(handle);
        }
        self.onboarding = OnboardingPhase::Showing;
        self.pending_onboarding = Some(
            self.scheduler
                .schedule(self.timing.onboarding, ChromeTask::FadeOnboarding),
        );
    }

    /// Run every chrome timer due by `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(task) = self.scheduler.pop_next_due(now_ms) {
            match task {
                ChromeTask::HideTabBar => {
                    self.pending_hide = None;
                    self.hide_tab_bar();
                }
                ChromeTask::FadeOnboarding => {
                    self.onboarding = OnboardingPhase::Fading;
                    self.pending_onboarding = Some(
                        self.scheduler
                            .schedule(self.timing.onboarding_fade, ChromeTask::HideOnboarding),
                    );
                }
                ChromeTask::HideOnboarding => {
                    self.pending_onboarding = None;
                    self.onboarding = OnboardingPhase::Hidden;
                    self.show_tab_bar(true);
                }
                ChromeTask::SessionTabBar => self.show_tab_bar(true),
            }
        }
    }

    /// Deadline of the next chrome timer, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }
}
