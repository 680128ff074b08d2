//! Candidate lookup for narrowed reference inputs.
//!
//! Dispatches to a direct bundle search or a named view depending on the
//! selection settings the bundle selector left on the input.

use crate::host::{Candidate, CandidateSource};
use narrow_types::{FormNode, SelectionHandler};
use tracing::warn;

/// Runs the candidate search a narrowed reference input is configured for.
pub struct CandidateLookup<'a> {
    source: &'a dyn CandidateSource,
}

impl<'a> CandidateLookup<'a> {
    pub fn new(source: &'a dyn CandidateSource) -> Self {
        Self { source }
    }

    /// Candidates for `text` according to `input`'s selection settings.
    ///
    /// An input without selection settings, or a view handler without a
    /// view, offers nothing.
    pub fn lookup(&self, input: &FormNode, text: &str, limit: usize) -> Vec<Candidate> {
        let Some(selection) = input.selection.as_ref() else {
            warn!("reference input has no selection settings");
            return Vec::new();
        };

        let mut candidates = match (selection.handler, selection.view.as_ref()) {
            (SelectionHandler::Views, Some(view)) => {
                self.source
                    .execute_view(&selection.target_type, view, text, limit)
            }
            (SelectionHandler::Views, None) => {
                warn!(target_type = %selection.target_type, "view handler without a view");
                Vec::new()
            }
            (SelectionHandler::Default, _) => self.source.search_bundles(
                &selection.target_type,
                selection.target_bundles.as_deref(),
                text,
                limit,
            ),
        };
        candidates.truncate(limit);
        candidates
    }
}
