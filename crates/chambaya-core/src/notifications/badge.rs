//! Bell glyph and unread badge.

use std::fmt;

use crate::navigation::Route;

/// Counts above this render as `99+`.
pub const BADGE_CAP: usize = 99;

/// Bell icon state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BellGlyph {
    HasUnread,
    Empty,
}

impl BellGlyph {
    /// Icon name in the client's icon set.
    pub fn icon_name(self) -> &'static str {
        match self {
            BellGlyph::HasUnread => "notifications",
            BellGlyph::Empty => "notifications-outline",
        }
    }
}

/// Unread notification summary shown on the bell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationBadge {
    pub count: usize,
}

impl NotificationBadge {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn glyph(&self) -> BellGlyph {
        if self.count > 0 {
            BellGlyph::HasUnread
        } else {
            BellGlyph::Empty
        }
    }

    /// Badge text; `None` hides the badge.
    pub fn label(&self) -> Option<String> {
        match self.count {
            0 => None,
            n if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
            n => Some(n.to_string()),
        }
    }

    /// Where pressing the bell goes.
    pub fn route(&self) -> Route {
        Route::Notifications
    }
}

impl fmt::Display for NotificationBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = self.glyph().icon_name();
        match self.label() {
            Some(label) => write!(f, "{icon} ({label})"),
            None => f.write_str(icon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_caps_at_99() {
        assert_eq!(NotificationBadge::new(150).label().as_deref(), Some("99+"));
        assert_eq!(NotificationBadge::new(100).label().as_deref(), Some("99+"));
        assert_eq!(NotificationBadge::new(99).label().as_deref(), Some("99"));
        assert_eq!(NotificationBadge::new(1).label().as_deref(), Some("1"));
    }

    #[test]
    fn test_zero_hides_badge() {
        let badge = NotificationBadge::new(0);
        assert_eq!(badge.label(), None);
        assert_eq!(badge.glyph(), BellGlyph::Empty);
        assert_eq!(badge.to_string(), "notifications-outline");
    }

    #[test]
    fn test_unread_glyph_and_route() {
        let badge = NotificationBadge::new(3);
        assert_eq!(badge.glyph().icon_name(), "notifications");
        assert_eq!(badge.to_string(), "notifications (3)");
        assert_eq!(badge.route(), Route::Notifications);
    }
}
