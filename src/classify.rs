use serde::Serialize;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

/// How a stored URL gets previewed. Derived on every render, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
    Webpage,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Image => "image",
            ContentKind::Video => "video",
            ContentKind::Webpage => "webpage",
        }
    }
}

/// Classifies a URL by the text after its last `.`.
///
/// A URL without any `.` is treated as one long extension, which never matches,
/// so it falls through to [`ContentKind::Webpage`].
pub fn classify(url: &str) -> ContentKind {
    let extension = url.rsplit('.').next().unwrap_or(url).to_lowercase();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        ContentKind::Image
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        ContentKind::Video
    } else {
        ContentKind::Webpage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_images() {
        assert_eq!(classify("a.png"), ContentKind::Image);
        assert_eq!(classify("https://cdn.example.com/photos/cat.JPEG"), ContentKind::Image);
        assert_eq!(classify("/image1.jpg"), ContentKind::Image);
        assert_eq!(classify("party.Gif"), ContentKind::Image);
    }

    #[test]
    fn test_classify_videos() {
        assert_eq!(classify("a.MP4"), ContentKind::Video);
        assert_eq!(classify("https://example.com/clip.webm"), ContentKind::Video);
        assert_eq!(classify("song.ogg"), ContentKind::Video);
    }

    #[test]
    fn test_classify_falls_back_to_webpage() {
        assert_eq!(classify("https://example.com/page"), ContentKind::Webpage);
        assert_eq!(classify("noextension"), ContentKind::Webpage);
        assert_eq!(classify(""), ContentKind::Webpage);
        assert_eq!(classify("trailing."), ContentKind::Webpage);
        // query strings are not stripped, only the last dot counts
        assert_eq!(classify("https://example.com/a.png?size=large"), ContentKind::Webpage);
    }
}
