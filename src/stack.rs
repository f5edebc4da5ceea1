//! Bundle stack: posts set aside while paging through a bundle.
//!
//! Moving forward inside a bundle keeps the previous post on screen, dimmed
//! and receding, instead of sliding it away. Those set-aside slides form a
//! LIFO stack. Paging back onto a stacked slide pops it and un-dims it in
//! place, without an entrance transition.
//!
//! ```text
//! stack (bottom → top)     depth tier
//! [ 1,                     2   (capped at max_depth)
//!   4,                     1
//!   6 ]                    0   (most recent, no depth class)
//! active: 7
//! ```
//!
//! The stack never holds the active slide. Leaving the bundle (or the
//! section) clears it; the renderer fades the cleared slides out.

use crate::types::BundleId;

/// Visual depth of one stacked slide. `0` is the entry just below the active
/// slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackDepth {
    pub slide: usize,
    pub depth: u8,
}

#[derive(Debug, Clone)]
pub struct BundleStack {
    entries: Vec<usize>,
    bundle: Option<BundleId>,
    max_depth: u8,
}

impl BundleStack {
    pub fn new(max_depth: u8) -> Self {
        Self {
            entries: Vec::new(),
            bundle: None,
            max_depth: max_depth.max(1),
        }
    }

    /// Set `slide` aside on top of the stack.
    pub fn push(&mut self, slide: usize) -> Vec<StackDepth> {
        self.entries.push(slide);
        tracing::debug!(slide, stack = ?self.entries, "stack push");
        self.depths()
    }

    /// Remove and return the top entry.
    pub fn pop(&mut self) -> Option<usize> {
        let popped = self.entries.pop();
        tracing::debug!(?popped, stack = ?self.entries, "stack pop");
        popped
    }

    /// Remove `slide` wherever it sits. Returns whether it was stacked.
    pub fn remove(&mut self, slide: usize) -> bool {
        match self.entries.iter().position(|&s| s == slide) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Empty the stack and forget the tracked bundle. Returns the slides that
    /// were stacked, bottom first.
    pub fn clear(&mut self) -> Vec<usize> {
        self.bundle = None;
        if !self.entries.is_empty() {
            tracing::debug!(stack = ?self.entries, "stack clear");
        }
        std::mem::take(&mut self.entries)
    }

    pub fn contains(&self, slide: usize) -> bool {
        self.entries.contains(&slide)
    }

    pub fn top(&self) -> Option<usize> {
        self.entries.last().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stacked slide indices, bottom first.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    pub fn current_bundle(&self) -> Option<BundleId> {
        self.bundle
    }

    /// Track the bundle of the slide being entered.
    ///
    /// When it differs from the tracked bundle the stack is cleared (even if
    /// already empty) before the new id is adopted; the cleared slides are
    /// returned.
    pub fn enter_bundle(&mut self, bundle: Option<BundleId>) -> Option<Vec<usize>> {
        if self.bundle == bundle {
            return None;
        }
        let cleared = self.clear();
        self.bundle = bundle;
        Some(cleared)
    }

    /// Depth tier of every stacked slide, bottom first.
    pub fn depths(&self) -> Vec<StackDepth> {
        let len = self.entries.len();
        self.entries
            .iter()
            .enumerate()
            .map(|(i, &slide)| {
                let from_top = len - 1 - i;
                let depth = u8::try_from(from_top).unwrap_or(u8::MAX).min(self.max_depth);
                StackDepth { slide, depth }
            })
            .collect()
    }
}
