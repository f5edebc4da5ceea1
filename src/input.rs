//! Keyboard and touch input, mapped to viewer commands.
//!
//! | Key | Command |
//! |---|---|
//! | `ArrowRight` / `ArrowLeft` | next / previous slide |
//! | `ArrowDown` / `ArrowUp` | next / previous section |
//! | `m` | toggle view mode |
//! | `f` | toggle tag panel |
//! | `h` | show onboarding |
//! | `Escape` | close tag panel, else hide tab bar |
//!
//! A touch gesture is a swipe when it ends within `max_swipe_ms` and moves
//! farther than `min_swipe_distance` along its dominant axis. Swiping right
//! or down goes back. A short touch that barely moves is a tap; taps in the
//! top zone toggle the tab bar.

use crate::config::InputConfig;
use crate::navigation::{Direction, Intent};
use std::str::FromStr;

/// Everything the viewer can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Intent),
    ToggleMode,
    ToggleTagPanel,
    ShowOnboarding,
    Escape,
    ToggleTabBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    ArrowDown,
    ArrowUp,
    Char(char),
    Escape,
}

impl FromStr for Key {
    type Err = String;

    /// Accepts DOM key names (`ArrowRight`, `Escape`, ...) or a single
    /// character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowRight" | "right" => Ok(Key::ArrowRight),
            "ArrowLeft" | "left" => Ok(Key::ArrowLeft),
            "ArrowDown" | "down" => Ok(Key::ArrowDown),
            "ArrowUp" | "up" => Ok(Key::ArrowUp),
            "Escape" | "esc" => Ok(Key::Escape),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(format!("unknown key: {other}")),
                }
            }
        }
    }
}

pub fn command_for_key(key: Key) -> Option<Command> {
    let command = match key {
        Key::ArrowRight => Command::Navigate(Intent::Horizontal(Direction::Next)),
        Key::ArrowLeft => Command::Navigate(Intent::Horizontal(Direction::Prev)),
        Key::ArrowDown => Command::Navigate(Intent::Vertical(Direction::Next)),
        Key::ArrowUp => Command::Navigate(Intent::Vertical(Direction::Prev)),
        Key::Char('m') => Command::ToggleMode,
        Key::Char('f') => Command::ToggleTagPanel,
        Key::Char('h') => Command::ShowOnboarding,
        Key::Escape => Command::Escape,
        Key::Char(_) => return None,
    };
    Some(command)
}

/// A finished touch: where it started, where it ended, how long it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Swipe(Swipe),
    Tap { top_zone: bool },
}

/// Axis and direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Horizontal(Direction),
    Vertical(Direction),
}

impl From<Swipe> for Intent {
    fn from(swipe: Swipe) -> Self {
        match swipe {
            Swipe::Horizontal(d) => Intent::Horizontal(d),
            Swipe::Vertical(d) => Intent::Vertical(d),
        }
    }
}

pub fn classify_touch(touch: &Touch, config: &InputConfig) -> Option<Gesture> {
    if touch.duration_ms > config.max_swipe_ms {
        return None;
    }
    let dx = touch.end.0 - touch.start.0;
    let dy = touch.end.1 - touch.start.1;
    let (ax, ay) = (dx.abs(), dy.abs());
    let min = f64::from(config.min_swipe_distance);
    let slop = f64::from(config.tap_slop);

    if ax > ay && ax > min {
        let dir = if dx > 0.0 { Direction::Prev } else { Direction::Next };
        Some(Gesture::Swipe(Swipe::Horizontal(dir)))
    } else if ay > ax && ay > min {
        let dir = if dy > 0.0 { Direction::Prev } else { Direction::Next };
        Some(Gesture::Swipe(Swipe::Vertical(dir)))
    } else if ax < slop && ay < slop {
        Some(Gesture::Tap {
            top_zone: touch.end.1 < f64::from(config.top_tap_zone),
        })
    } else {
        None
    }
}

pub fn command_for_touch(touch: &Touch, config: &InputConfig) -> Option<Command> {
    match classify_touch(touch, config)? {
        Gesture::Swipe(swipe) => Some(Command::Navigate(swipe.into())),
        Gesture::Tap { top_zone: true } => Some(Command::ToggleTabBar),
        Gesture::Tap { top_zone: false } => None,
    }
}
