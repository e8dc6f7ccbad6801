//! Shared utilities for use cases.
//!
//! Cancellation checks used by the invoker and both use cases.

use tokio_util::sync::CancellationToken;

/// Whether cancellation has been requested on an optional token.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}
