//! Transient player notices.
//!
//! Only the latest notice is shown. It disappears after a fixed span of
//! loop time.

/// Default notice lifetime, in seconds of loop time.
pub const DEFAULT_NOTICE_TTL: f32 = 5.0;

/// Holds the notice currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct NoticeBoard {
    ttl: f32,
    current: Option<(String, f32)>,
}

impl NoticeBoard {
    /// Creates an empty board whose notices live for `ttl` seconds.
    #[must_use]
    pub fn new(ttl: f32) -> Self {
        Self {
            ttl: ttl.max(0.0),
            current: None,
        }
    }

    /// Replaces the current notice.
    pub fn post(&mut self, message: impl Into<String>) {
        self.current = Some((message.into(), self.ttl));
    }

    /// Ages the current notice by `dt`. Returns `true` if it just expired.
    pub fn expire(&mut self, dt: f32) -> bool {
        let Some((_, remaining)) = self.current.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.current = None;
            return true;
        }
        false
    }

    /// The notice on screen, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(message, _)| message.as_str())
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
