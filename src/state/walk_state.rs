/// Walker state definitions
///
/// The message page walker alternates between fetching and processing pages
/// until the target is reached or the history runs out.
use std::fmt;

/// Represents the current state of the message page walker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkState {
    /// Waiting for the next page of messages
    FetchingPage,

    /// Extracting links from the page just received
    ProcessingPage,

    /// Target reached or history exhausted
    Done,
}

impl WalkState {
    /// Returns true if the walk is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// ```text
    /// FetchingPage -> ProcessingPage | Done
    /// ProcessingPage -> FetchingPage | Done
    /// Done -> (nothing)
    /// ```
    pub fn can_transition_to(&self, next: WalkState) -> bool {
        matches!(
            (self, next),
            (Self::FetchingPage, Self::ProcessingPage)
                | (Self::FetchingPage, Self::Done)
                | (Self::ProcessingPage, Self::FetchingPage)
                | (Self::ProcessingPage, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchingPage => "fetching_page",
            Self::ProcessingPage => "processing_page",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
