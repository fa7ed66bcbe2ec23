//! Embed-friendly URL rewriting and direct-media detection.
//!
//! Discord renders previews poorly for a handful of popular hosts; swapping
//! them for community mirror domains fixes the embed. Direct media (images,
//! clips) already embeds fine where it was posted.

use url::Url;

/// Host replacements applied by [`embed_friendly`]. Matched against the host
/// with any `www.` prefix removed; subdomains of an entry also match.
const EMBED_REWRITES: &[(&str, &str)] = &[
    ("twitter.com", "fxtwitter.com"),
    ("x.com", "fxtwitter.com"),
    ("instagram.com", "ddinstagram.com"),
    ("tiktok.com", "vxtiktok.com"),
    ("pixiv.net", "phixiv.net"),
    ("bsky.app", "bskx.app"),
];

/// File extensions that count as direct media.
const MEDIA_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff",
    // Videos
    ".mp4", ".webm", ".mov", ".avi", ".mkv", ".flv", ".m4v", ".gifv",
];

/// Video hosts whose links already embed well and should not be rewritten.
const MEDIA_HOSTS: &[&str] = &[
    "gfycat.com",
    "streamable.com",
    "v.redd.it",
    "clips.twitch.tv",
    "medal.tv",
    "tenor.com",
    "giphy.com",
];

/// True when `link` points at a media file or a video host that embeds
/// directly.
pub fn is_media_url(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();

    if MEDIA_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return true;
    }

    let Some(host) = host_of(&lower) else {
        return false;
    };
    if MEDIA_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    {
        return true;
    }

    // Imgur pages get rewritten by Discord itself; only raw clips count.
    host.ends_with("imgur.com") && (lower.contains(".mp4") || lower.contains(".gifv"))
}

/// Rewrite `link` to its embed-friendly form, or return it unchanged when no
/// rule applies or the URL does not parse.
pub fn embed_friendly(link: &str) -> String {
    let Ok(url) = Url::parse(link) else {
        return link.to_string();
    };
    let Some(host) = url.host_str() else {
        return link.to_string();
    };
    let host = host.strip_prefix("www.").unwrap_or(host);

    // YouTube collapses to the short-link form rather than a mirror host.
    if host == "youtube.com" || host == "m.youtube.com" {
        if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "v") {
            return format!("https://youtu.be/{id}");
        }
        if let Some(id) = url.path().strip_prefix("/shorts/") {
            let id = id.trim_end_matches('/');
            if !id.is_empty() {
                return format!("https://youtu.be/{id}");
            }
        }
        return link.to_string();
    }

    // Reddit threads embed through the vxreddit mirror; everything else on
    // reddit.com is left alone.
    if (host == "reddit.com" || host.ends_with(".reddit.com")) && url.path().contains("/comments/")
    {
        return format!("https://vxreddit.com{}", url.path().trim_end_matches('/'));
    }

    for (from, to) in EMBED_REWRITES {
        if host == *from || host.ends_with(&format!(".{from}")) {
            let mut rewritten = format!("https://{to}{}", url.path());
            if let Some(query) = url.query() {
                rewritten.push('?');
                rewritten.push_str(query);
            }
            return rewritten;
        }
    }

    link.to_string()
}

fn host_of(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_extensions() {
        assert!(is_media_url("https://cdn.example.com/pic.png"));
        assert!(is_media_url("https://cdn.example.com/CLIP.MP4"));
        assert!(!is_media_url("https://example.com/page"));
    }

    #[test]
    fn test_media_hosts() {
        assert!(is_media_url("https://streamable.com/abc123"));
        assert!(is_media_url("https://v.redd.it/xyz"));
        assert!(is_media_url("https://clips.twitch.tv/SomeClip"));
        assert!(!is_media_url("https://twitch.tv/somechannel"));
    }

    #[test]
    fn test_imgur_only_raw_clips() {
        assert!(is_media_url("https://i.imgur.com/abc.gifv"));
        assert!(!is_media_url("https://imgur.com/gallery/abc"));
    }

    #[test]
    fn test_twitter_rewrite() {
        assert_eq!(
            embed_friendly("https://twitter.com/user/status/123"),
            "https://fxtwitter.com/user/status/123"
        );
        assert_eq!(
            embed_friendly("https://x.com/user/status/123"),
            "https://fxtwitter.com/user/status/123"
        );
        assert_eq!(
            embed_friendly("https://www.twitter.com/user/status/123"),
            "https://fxtwitter.com/user/status/123"
        );
    }

    #[test]
    fn test_query_preserved() {
        assert_eq!(
            embed_friendly("https://twitter.com/user/status/123?s=20"),
            "https://fxtwitter.com/user/status/123?s=20"
        );
    }

    #[test]
    fn test_youtube_watch_to_short_link() {
        assert_eq!(
            embed_friendly("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://youtu.be/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_friendly("https://youtube.com/shorts/abc123/"),
            "https://youtu.be/abc123"
        );
        // Non-video YouTube pages pass through.
        assert_eq!(
            embed_friendly("https://youtube.com/@somechannel"),
            "https://youtube.com/@somechannel"
        );
    }

    #[test]
    fn test_reddit_threads() {
        assert_eq!(
            embed_friendly("https://old.reddit.com/r/rust/comments/abc/title/"),
            "https://vxreddit.com/r/rust/comments/abc/title"
        );
        assert_eq!(
            embed_friendly("https://reddit.com/r/rust"),
            "https://reddit.com/r/rust"
        );
    }

    #[test]
    fn test_unknown_hosts_pass_through() {
        assert_eq!(
            embed_friendly("https://example.com/a?b=c"),
            "https://example.com/a?b=c"
        );
        assert_eq!(embed_friendly("not a url"), "not a url");
    }
}
