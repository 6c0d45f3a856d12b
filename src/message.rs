//! Single-slot user-facing banner channel.
//!
//! One message at a time: setting a new message replaces the previous one,
//! there is no queue. Transient messages carry an auto-dismiss hint for
//! the presentation layer; persistent messages stay until dismissed.

use std::time::Duration;

/// Default auto-dismiss hint for transient banners.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerKind {
    /// Auto-dismissed by the presentation layer after the given delay.
    Transient { dismiss_after: Duration },
    /// Stays until the user dismisses it (network failures).
    Persistent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
}

/// The banner slot. Success and failure messages share this channel.
#[derive(Debug, Default)]
pub struct MessageChannel {
    current: Option<Banner>,
}

impl MessageChannel {
    pub fn set_transient(&mut self, text: impl Into<String>) {
        self.current = Some(Banner {
            text: text.into(),
            kind: BannerKind::Transient {
                dismiss_after: DEFAULT_DISMISS_AFTER,
            },
        });
    }

    pub fn set_persistent(&mut self, text: impl Into<String>) {
        self.current = Some(Banner {
            text: text.into(),
            kind: BannerKind::Persistent,
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_replaces_previous() {
        let mut channel = MessageChannel::default();
        channel.set_persistent("Failed to load menu. Please check the network.");
        channel.set_transient("Order Sent & Opened for Table 5");

        let banner = channel.current().expect("banner present");
        assert_eq!(banner.text, "Order Sent & Opened for Table 5");
        assert_eq!(
            banner.kind,
            BannerKind::Transient {
                dismiss_after: DEFAULT_DISMISS_AFTER
            }
        );
    }

    #[test]
    fn test_clear_empties_slot() {
        let mut channel = MessageChannel::default();
        channel.set_transient("hello");
        channel.clear();
        assert!(channel.current().is_none());
    }
}
