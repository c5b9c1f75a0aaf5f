//! Image path resolution.
//!
//! The backend emits image references in three forms: an absolute URL, a
//! path under `/api/files/images/`, or a bare filename. Uploaded assets are
//! served from `/uploads/images/`, so everything funnels there.

/// Fallback asset shown when a post has no usable image reference.
pub const DEFAULT_ART_IMAGE: &str = "/default-art.jpg";

/// Fallback asset shown when a user has no usable avatar reference.
pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

const UPLOADS_PREFIX: &str = "/uploads/images/";
const FILES_PREFIX: &str = "/api/files/images/";

/// Resolves a raw image reference to a servable path.
///
/// Absolute `http(s)` URLs pass through untouched. `/api/files/images/`
/// paths are rewritten to their `/uploads/images/` equivalent. A bare
/// filename (anything containing a dot) maps into `/uploads/images/`.
/// Everything else falls back to [`DEFAULT_ART_IMAGE`].
pub fn resolve_image_url(raw: &str) -> String {
    resolve(raw, DEFAULT_ART_IMAGE)
}

/// Resolves a raw avatar reference, falling back to [`DEFAULT_AVATAR`].
pub fn resolve_avatar_url(raw: &str) -> String {
    resolve(raw, DEFAULT_AVATAR)
}

fn resolve(raw: &str, fallback: &str) -> String {
    if raw.is_empty() {
        return fallback.to_owned();
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_owned();
    }

    if let Some(rest) = raw.strip_prefix(FILES_PREFIX) {
        let filename = rest.rsplit('/').next().unwrap_or(rest);
        return format!("{UPLOADS_PREFIX}{filename}");
    }

    if raw.starts_with(UPLOADS_PREFIX) {
        return raw.to_owned();
    }

    if raw.starts_with('/') {
        return raw.to_owned();
    }

    if raw.contains('.') {
        return format!("{UPLOADS_PREFIX}{raw}");
    }

    fallback.to_owned()
}

/// Returns the sibling path an image is also reachable under, if any.
///
/// The backend serves uploads both from `/uploads/images/` and from
/// `/api/files/images/`; when one of them 404s the other is worth a try.
pub fn alternative_image_url(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix(UPLOADS_PREFIX) {
        return Some(format!("{FILES_PREFIX}{rest}"));
    }
    if let Some(rest) = url.strip_prefix(FILES_PREFIX) {
        return Some(format!("{UPLOADS_PREFIX}{rest}"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_urls_pass_through() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            resolve_image_url("http://localhost:8081/uploads/images/a.png"),
            "http://localhost:8081/uploads/images/a.png"
        );
    }

    #[test]
    fn test_files_prefix_rewritten_to_uploads() {
        assert_eq!(
            resolve_image_url("/api/files/images/cat.jpg"),
            "/uploads/images/cat.jpg"
        );
    }

    #[test]
    fn test_bare_filename_maps_into_uploads() {
        assert_eq!(resolve_image_url("cat.jpg"), "/uploads/images/cat.jpg");
    }

    #[test]
    fn test_unresolvable_falls_back() {
        assert_eq!(resolve_image_url(""), DEFAULT_ART_IMAGE);
        assert_eq!(resolve_image_url("no-extension"), DEFAULT_ART_IMAGE);
        assert_eq!(resolve_avatar_url(""), DEFAULT_AVATAR);
    }

    #[test]
    fn test_rooted_paths_kept() {
        assert_eq!(resolve_image_url("/static/banner.png"), "/static/banner.png");
        assert_eq!(
            resolve_image_url("/uploads/images/b.png"),
            "/uploads/images/b.png"
        );
    }

    #[test]
    fn test_alternative_url_round_trip() {
        let alt = alternative_image_url("/uploads/images/x.png").unwrap();
        assert_eq!(alt, "/api/files/images/x.png");
        assert_eq!(
            alternative_image_url(&alt).as_deref(),
            Some("/uploads/images/x.png")
        );
        assert_eq!(alternative_image_url("https://cdn.example.com/x.png"), None);
    }
}
