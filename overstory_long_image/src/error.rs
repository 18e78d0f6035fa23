// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_region_decode::MetaReadError;

/// Errors surfaced to the host by [`LongImageView`](crate::LongImageView).
///
/// Region decode failures are not here: they are recovered by redrawing the
/// previous frame and reported through
/// [`LongImageView::last_decode_error`](crate::LongImageView::last_decode_error).
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The image could not be opened; nothing is displayed.
    #[error("cannot open image: {0}")]
    MetaRead(#[from] MetaReadError),
}

/// Result alias for view operations.
pub type Result<T, E = ViewError> = core::result::Result<T, E>;
