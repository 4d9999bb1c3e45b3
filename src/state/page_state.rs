/// Final state of one dequeued URL
///
/// `Recorded` is the happy path. The other states record why a dequeued URL
/// never became a graph node.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Recorded as a graph node
    Recorded,

    // ===== Skip States =====
    /// Dequeued beyond the maximum depth
    DepthExceeded,

    /// Redirected to a URL that was already visited
    DuplicateRedirect,

    /// Redirected to a URL outside the site scope
    OffSite,

    /// Shutdown was requested before the page was processed
    Cancelled,

    // ===== Error States =====
    /// Network error, timeout, non-success status or unreadable body
    Failed,
}

impl PageState {
    /// Returns true if an HTTP request went out before this state was reached
    ///
    /// Pages skipped at dequeue time never touch the network, so the
    /// politeness delay does not apply to them.
    pub fn made_request(&self) -> bool {
        !matches!(self, Self::DepthExceeded | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::DepthExceeded => "depth_exceeded",
            Self::DuplicateRedirect => "duplicate_redirect",
            Self::OffSite => "off_site",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
