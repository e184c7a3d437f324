//! Collaborator traits the dispatcher drives.
//!
//! Sinks and views are owned by the dispatcher and only ever touched from
//! its thread. Error-log collectors travel with each mutation, so they must
//! be shareable across threads.

/// An ordered sequence of display entries.
pub trait OutputSink {
    /// Add a new entry after the current last one.
    fn append(&mut self, text: &str);

    /// Overwrite the most recent entry.
    ///
    /// On an empty sink there is nothing to overwrite and the text is
    /// appended instead.
    fn replace_last(&mut self, text: &str);

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the sink has no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The window or panel a sink is displayed in.
pub trait View {
    /// Make the entry at `index` visible.
    fn request_scroll_to(&mut self, index: usize);

    /// Close the view. Called at most once, when its stream finishes.
    fn close(&mut self);
}

/// Collects every non-empty line emitted for one originating process.
pub trait ErrorLogCollector: Send + Sync {
    /// Record one line of output.
    fn record(&self, text: &str);
}

/// A view type for panes that never have a view.
///
/// It cannot be constructed, so `Dispatcher<S, NoView>` panes always hold
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoView {}

impl View for NoView {
    fn request_scroll_to(&mut self, _index: usize) {
        match *self {}
    }

    fn close(&mut self) {
        match *self {}
    }
}

impl OutputSink for Vec<String> {
    fn append(&mut self, text: &str) {
        self.push(text.to_owned());
    }

    fn replace_last(&mut self, text: &str) {
        match self.last_mut() {
            Some(last) => text.clone_into(last),
            None => self.push(text.to_owned()),
        }
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }
}
