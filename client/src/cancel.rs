// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Cancellation for in-flight API calls.

use std::future::Future;

use futures::FutureExt;
use futures::future::{AbortHandle, Abortable};

use crate::error::ApiError;

/// Handle that cancels a call wrapped by [`cancelable`].
#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    /// Cancels the call. The wrapped future resolves to [`ApiError::Cancelled`]
    /// the next time it is polled; the underlying request is dropped.
    pub fn cancel(&self) {
        self.0.abort();
    }

    /// Whether [`CancelHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// Wraps any API call so that it can be cancelled.
///
/// # Example
///
/// ```ignore
/// let (call, handle) = cancelable(client.virtual_users().get("42"));
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     handle.cancel();
/// });
/// let user = call.await?;
/// ```
pub fn cancelable<T, F>(fut: F) -> (impl Future<Output = Result<T, ApiError>>, CancelHandle)
where
    F: Future<Output = Result<T, ApiError>>,
{
    let (handle, registration) = AbortHandle::new_pair();
    let fut = Abortable::new(fut, registration).map(|a| a.unwrap_or(Err(ApiError::Cancelled)));
    (fut, CancelHandle(handle))
}
