use crate::completions::{self, CursorPosition, Suggestion};
use crate::document::LineSource;
use crate::error::CompletionError;
use crate::mode::CompletionMode;

/// Completion entry point bound to a live mode setting.
///
/// The mode getter is queried on every request, so a settings change takes
/// effect without rebuilding the provider.
pub struct CompletionProvider<F> {
    mode_getter: F,
}

impl<F> CompletionProvider<F>
where
    F: Fn() -> String,
{
    pub fn new(mode_getter: F) -> Self {
        Self { mode_getter }
    }

    pub fn current_mode(&self) -> CompletionMode {
        CompletionMode::parse_lenient(&(self.mode_getter)())
    }

    /// Run completion and hand the outcome to `callback` exactly once.
    ///
    /// A bad position is reported in the error slot alongside an empty list.
    pub fn get_completions<D, C>(
        &self,
        doc: &D,
        position: CursorPosition,
        prefix: &str,
        callback: C,
    ) where
        D: LineSource + ?Sized,
        C: FnOnce(Option<CompletionError>, Vec<Suggestion>),
    {
        match completions::generate(self.current_mode(), doc, position, prefix) {
            Ok(suggestions) => callback(None, suggestions),
            Err(e) => callback(Some(e), Vec::new()),
        }
    }
}
