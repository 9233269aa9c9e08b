//! Surfaces the hosting runtime exposes to the grid

/// Host runtime services used for user-visible error reporting
pub trait HostServices: Send + Sync {
    /// Open a modal error dialog with one line per message
    fn open_error_dialog(&self, title: &str, messages: &[String]);
}

/// Host that drops every dialog, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl HostServices for NoopHost {
    fn open_error_dialog(&self, title: &str, messages: &[String]) {
        tracing::warn!(title, count = messages.len(), "error dialog requested without a host");
    }
}
