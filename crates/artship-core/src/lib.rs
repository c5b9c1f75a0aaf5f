//! Domain model and response normalization for the artship platform.
//!
//! The artship backend serializes its entities loosely: author records show
//! up under several field spellings, tags arrive as bare strings or as
//! records, image paths come in three different prefixes. This crate owns
//! the canonical shapes ([`User`], [`ArtPost`], [`Tag`], [`Page`]) and the
//! normalization functions that map every observed wire shape onto them,
//! supplying defaults for each optional field.
//!
//! Normalization is total where the input allows it: a record without the
//! identifying fields yields `None` rather than a fabricated entity.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod art;
mod assets;
mod page;
mod tag;
mod user;

pub use crate::art::{ArtPost, RawArt};
pub use crate::assets::{
    DEFAULT_ART_IMAGE, DEFAULT_AVATAR, alternative_image_url, resolve_avatar_url,
    resolve_image_url,
};
pub use crate::page::Page;
pub use crate::tag::{
    EMPTY_TAG_LINE, Tag, TagRef, TagsField, format_tag_line, normalize_tag, parse_tag_line,
};
pub use crate::user::{Author, RawAuthor, RawUser, User, UNKNOWN_AUTHOR_NAME};
