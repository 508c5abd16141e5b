//! Classification of server response messages
//!
//! The portal returns free-text Chinese messages; the retry loop stops only
//! when one of four known substrings appears. The literals below are compared
//! against live server output and must stay byte-for-byte exact — never
//! translate or normalize them.

use std::fmt;

use crate::booking::BookingChunk;

/// Message for a place that is not in the facility table.
///
/// Emitted before any network call. Deliberately absent from the terminal
/// set: an unknown place keeps the retry loop spinning (at zero network
/// cost, since the short-circuit happens before the POST). Known sharp edge.
pub const MSG_BAD_PLACE: &str = "地点错误";

/// Message substituted for any transport or TLS failure
pub const MSG_REQUEST_FAILED: &str = "请求失败, 检查网络、代理服务器或 VPN";

/// Message substituted for a response body that is not valid JSON
pub const MSG_COOKIE_EXPIRED: &str = "Cookie 过期";

/// Server message on a successful booking
pub const MSG_SAVED: &str = "保存成功";

/// Server message when the slot was grabbed by someone else first
pub const MSG_SLOT_TAKEN: &str = "手速太慢，该时间段已经被预订啦";

/// Severity of the popup raised at a chunk's terminal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for PopupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Terminal outcome of one chunk's retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Session cookie no longer valid; retrying cannot succeed
    CookieExpired,
    /// Booking saved
    Saved,
    /// Slot already taken by another user
    SlotTaken,
    /// Transport failure; surfaced to the user instead of retrying forever
    RequestFailed,
}

/// Terminal needles in priority order; checked by substring, not equality
const TERMINAL_RULES: &[(&str, Outcome)] = &[
    (MSG_COOKIE_EXPIRED, Outcome::CookieExpired),
    (MSG_SAVED, Outcome::Saved),
    (MSG_SLOT_TAKEN, Outcome::SlotTaken),
    (MSG_REQUEST_FAILED, Outcome::RequestFailed),
];

impl Outcome {
    /// Classify a raw attempt message; `None` means keep retrying
    pub fn classify(message: &str) -> Option<Self> {
        TERMINAL_RULES
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map(|(_, outcome)| *outcome)
    }

    /// Popup severity for this outcome
    pub fn level(self) -> PopupLevel {
        match self {
            Self::Saved => PopupLevel::Info,
            Self::SlotTaken => PopupLevel::Warn,
            Self::CookieExpired | Self::RequestFailed => PopupLevel::Error,
        }
    }

    /// User-facing popup text for this outcome on a given chunk
    pub fn popup_text(self, chunk: &BookingChunk) -> String {
        match self {
            Self::Saved => format!("保存成功：{chunk}"),
            Self::SlotTaken => format!("已被预订：{chunk}"),
            Self::CookieExpired => "Cookie 过期，请重新获取并设置 Cookie。".to_string(),
            Self::RequestFailed => "请求失败，请检查网络、代理服务器或 VPN。".to_string(),
        }
    }
}
