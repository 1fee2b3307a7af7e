//! Overlay states and the result caption

use crate::items::Rarity;
use crate::matcher::{format_price, MatchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    /// Visible, no result yet (fresh or query too short)
    VisibleWaiting,
    /// Visible, showing a match or "No match"
    VisibleResult,
    /// After `Exit`; every further message is ignored
    Exited,
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::VisibleWaiting | Self::VisibleResult)
    }
}

const READY_COLOR: u32 = 0xFFCC00;
const WAITING_COLOR: u32 = 0x777777;
const NO_MATCH_COLOR: u32 = 0x555555;

/// What the result caption shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultDisplay {
    /// Before the overlay has been shown once
    Ready,
    /// Freshly shown, nothing typed
    Waiting,
    /// Query shorter than the minimum length
    TooShort,
    NoMatch,
    Match {
        name: String,
        price: u64,
        rarity: Rarity,
    },
}

impl ResultDisplay {
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::TooShort => Self::TooShort,
            MatchOutcome::NoMatch => Self::NoMatch,
            MatchOutcome::Match(found) => Self::Match {
                name: found.item.name.clone(),
                price: found.item.price,
                rarity: found.item.rarity,
            },
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Ready => "Ready".to_string(),
            Self::Waiting => "Waiting for input...".to_string(),
            Self::TooShort => "...".to_string(),
            Self::NoMatch => "No match".to_string(),
            Self::Match { name, price, .. } => format!("{}: {}", name, format_price(*price)),
        }
    }

    /// `0xRRGGBB` caption color.
    pub fn color(&self) -> u32 {
        match self {
            Self::Ready => READY_COLOR,
            Self::Waiting | Self::TooShort => WAITING_COLOR,
            Self::NoMatch => NO_MATCH_COLOR,
            Self::Match { rarity, .. } => rarity.color().0,
        }
    }

    /// State the overlay is in while this caption is shown.
    pub fn visible_state(&self) -> OverlayState {
        match self {
            Self::Match { .. } | Self::NoMatch => OverlayState::VisibleResult,
            _ => OverlayState::VisibleWaiting,
        }
    }
}
