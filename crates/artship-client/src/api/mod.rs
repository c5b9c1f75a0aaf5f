//! Typed endpoint modules, one per backend domain.
//!
//! Each module is a thin set of endpoint functions over the request
//! executor; header handling, token attachment and error mapping all live
//! in one place upstream.

mod art;
mod follow;
mod like;
mod tag;
mod user;

use artship_core::{ArtPost, Page, RawArt, RawUser, User};
use serde_json::Value;

pub use self::art::{ArtApi, ArtPatch, ImageUpload, MAX_IMAGE_BYTES, NewArt};
pub use self::follow::{FollowApi, FollowEdge};
pub use self::like::{LikeApi, LikeRecord};
pub use self::tag::TagApi;
pub use self::user::{ProfilePatch, UserApi};

use crate::error::{Error, Result};

/// Decodes and normalizes one art post.
pub(crate) fn decode_art(value: Value) -> Result<ArtPost> {
    let raw: RawArt = serde_json::from_value(value)?;
    raw.normalize()
        .ok_or_else(|| Error::unexpected_shape("art record carries no id"))
}

/// Decodes and normalizes a page of art posts, dropping malformed rows.
pub(crate) fn decode_art_page(value: Value) -> Result<Page<ArtPost>> {
    let page: Page<RawArt> = serde_json::from_value(value)?;
    Ok(page.filter_map(RawArt::normalize))
}

/// Decodes and normalizes one user record.
pub(crate) fn decode_user(value: Value) -> Result<User> {
    let raw: RawUser = serde_json::from_value(value)?;
    raw.normalize()
        .ok_or_else(|| Error::unexpected_shape("user record carries no id or username"))
}
