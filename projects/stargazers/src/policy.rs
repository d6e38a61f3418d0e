use std::num::NonZeroU64;
use std::ops::Range;

use chrono::Timelike;
use interfaces_github_stargazers::StarCount;
use thiserror::Error;

pub const DEFAULT_MILESTONE: NonZeroU64 = match NonZeroU64::new(1000) {
    Some(milestone) => milestone,
    None => panic!("milestone must be non-zero"),
};
pub const DEFAULT_WINDOW_HOUR: u32 = 9;
pub const DEFAULT_WINDOW_MINUTES: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationWindowError {
    #[error("window hour {hour} is not between 0 and 23")]
    HourOutOfRange { hour: u32 },

    #[error("window width {minutes} must be between 1 and 60 minutes")]
    WidthOutOfRange { minutes: u32 },
}

/// Daily clock band, `hour:00` inclusive to `hour:minutes` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationWindow {
    hour: u32,
    minutes: Range<u32>,
}

impl NotificationWindow {
    pub fn new(hour: u32, minutes: u32) -> Result<Self, NotificationWindowError> {
        if hour > 23 {
            return Err(NotificationWindowError::HourOutOfRange { hour });
        }
        if minutes == 0 || minutes > 60 {
            return Err(NotificationWindowError::WidthOutOfRange { minutes });
        }
        Ok(Self {
            hour,
            minutes: 0..minutes,
        })
    }

    pub fn contains<T: Timelike>(&self, now: &T) -> bool {
        now.hour() == self.hour && self.minutes.contains(&now.minute())
    }
}

impl Default for NotificationWindow {
    fn default() -> Self {
        Self {
            hour: DEFAULT_WINDOW_HOUR,
            minutes: 0..DEFAULT_WINDOW_MINUTES,
        }
    }
}

/// Notify on every `milestone`-th star, and once a day inside `window`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPolicy {
    milestone: NonZeroU64,
    window: NotificationWindow,
}

impl NotificationPolicy {
    pub fn new(milestone: NonZeroU64, window: NotificationWindow) -> Self {
        Self { milestone, window }
    }

    pub fn is_milestone(&self, count: StarCount) -> bool {
        count % self.milestone.get() == 0
    }

    pub fn should_notify<T: Timelike>(&self, count: StarCount, now: &T) -> bool {
        self.is_milestone(count) || self.window.contains(now)
    }
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            milestone: DEFAULT_MILESTONE,
            window: NotificationWindow::default(),
        }
    }
}

/// [`NotificationPolicy::should_notify`] with the default milestone and window.
pub fn should_notify<T: Timelike>(count: StarCount, now: &T) -> bool {
    NotificationPolicy::default().should_notify(count, now)
}
