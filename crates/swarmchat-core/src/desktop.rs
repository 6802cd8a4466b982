//! Desktop integration seam
//!
//! Focus detection and system notifications. Both degrade gracefully:
//! without a desktop environment the window counts as always focused and
//! notifications go nowhere.

// ----------------------------------------------------------------------------
// Desktop Trait
// ----------------------------------------------------------------------------

/// Window focus and notification access
pub trait Desktop: Send {
    /// Whether the client window currently has focus. Defaults to true so
    /// mention notifications are suppressed rather than spammed when focus
    /// detection is unavailable.
    fn is_focused(&self) -> bool {
        true
    }

    /// Fire-and-forget system notification
    fn notify(&self, _title: &str, _body: &str) {}
}

/// Desktop implementation for headless environments
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDesktop;

impl Desktop for HeadlessDesktop {}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_desktop_is_always_focused() {
        let desktop = HeadlessDesktop;
        assert!(desktop.is_focused());
        desktop.notify("title", "body");
    }
}
