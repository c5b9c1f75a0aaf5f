//! User and author records.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::assets::{DEFAULT_AVATAR, resolve_avatar_url};

/// Display name used when no author information survives normalization.
pub const UNKNOWN_AUTHOR_NAME: &str = "Unknown author";

/// A normalized platform user.
///
/// Only ever produced from [`RawUser::normalize`], which supplies a default
/// for every optional backend field, so consumers never branch on absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Falls back to `username` when the profile has none.
    pub display_name: String,
    /// Only present on the caller's own record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: String,
    /// Resolved through the upload path rules, never empty.
    pub avatar_url: String,
    /// Only an explicit backend `false` makes a profile private.
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

/// A user record as the backend serializes it.
///
/// Every field is optional and the avatar has drifted through several
/// spellings across backend versions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "nickname")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, alias = "pfp", alias = "avatar", alias = "profilePicture")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
}

impl RawUser {
    /// Normalizes into a [`User`], defaulting every optional field.
    ///
    /// Returns `None` when the record lacks an id or a username; such
    /// records cannot be addressed and are treated as absent.
    pub fn normalize(self) -> Option<User> {
        let id = self.id?;
        let username = self.username?;
        let display_name = self
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| username.clone());

        Some(User {
            id,
            username,
            display_name,
            email: self.email,
            bio: self.bio.unwrap_or_default(),
            avatar_url: resolve_avatar_url(self.avatar_url.as_deref().unwrap_or_default()),
            is_public: self.is_public != Some(false),
            created_at: self.created_at,
        })
    }
}

/// The author summary embedded in an art post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub display_name: String,
    pub avatar_url: String,
}

impl Author {
    /// The placeholder author used when normalization has nothing to go on.
    pub fn unknown(id: i64) -> Self {
        Self {
            id,
            display_name: UNKNOWN_AUTHOR_NAME.to_owned(),
            avatar_url: DEFAULT_AVATAR.to_owned(),
        }
    }
}

/// An embedded author as the backend serializes it.
///
/// Name and avatar fields have each gone through several spellings; the
/// precedence in [`RawAuthor::normalize`] matches what the backend actually
/// populated over time, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    #[serde(default, alias = "userId")]
    pub id: Option<i64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "pfp", alias = "avatar", alias = "profilePicture")]
    pub avatar_url: Option<String>,
}

impl RawAuthor {
    /// Normalizes an embedded author, using the surrounding post's
    /// `authorId`/`authorName` columns as fallbacks.
    pub fn normalize(self, fallback_id: Option<i64>, fallback_name: Option<&str>) -> Author {
        let id = self.id.or(fallback_id).unwrap_or(0);

        let name = [
            self.display_name.as_deref(),
            self.nickname.as_deref(),
            self.name.as_deref(),
            self.username.as_deref(),
            fallback_name,
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty() && *candidate != UNKNOWN_AUTHOR_NAME);

        Author {
            id,
            display_name: name.map(collapse_doubled).unwrap_or_else(|| {
                UNKNOWN_AUTHOR_NAME.to_owned()
            }),
            avatar_url: resolve_avatar_url(self.avatar_url.as_deref().unwrap_or_default()),
        }
    }
}

/// Collapses a name that is its own first half repeated.
///
/// A backend join bug used to concatenate the display name with itself;
/// the artifact survives in stored rows.
fn collapse_doubled(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if !chars.is_empty() && chars.len() % 2 == 0 {
        let half = chars.len() / 2;
        if chars[..half] == chars[half..] {
            return chars[..half].iter().collect();
        }
    }
    name.to_owned()
}
