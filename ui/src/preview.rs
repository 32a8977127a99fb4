//! Remote-storage preview modal state.

use api_client::Photo;
use iced::widget::image::Handle;

/// Which remote object the preview shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Thumbnail,
    Original,
}

impl PreviewKind {
    pub fn label(&self) -> &'static str {
        match self {
            PreviewKind::Thumbnail => "Remote thumbnail",
            PreviewKind::Original => "Remote original",
        }
    }

    /// The remote-storage URL this kind previews for a photo.
    pub fn source_url<'a>(&self, photo: &'a Photo) -> &'a str {
        match self {
            PreviewKind::Thumbnail => &photo.thumbnail,
            PreviewKind::Original => &photo.path,
        }
    }
}

/// State of the open preview modal. The image itself arrives later via
/// the proxy; until then the modal shows a loading placeholder.
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub filename: String,
    pub kind: PreviewKind,
    pub source_url: String,
    pub handle: Option<Handle>,
    pub error: Option<String>,
}

impl PreviewState {
    pub fn new(photo: &Photo, kind: PreviewKind) -> Self {
        PreviewState {
            filename: photo.filename.clone(),
            kind,
            source_url: kind.source_url(photo).to_string(),
            handle: None,
            error: None,
        }
    }

    pub fn title(&self) -> String {
        format!("{}: {}", self.kind.label(), self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Photo {
        Photo {
            filename: "DSC_0001.jpg".into(),
            year: "2025".into(),
            date: "2025-03-14".into(),
            width: 6000,
            height: 4000,
            alt: None,
            subject: Vec::new(),
            is_hidden: false,
            path: "https://r2.example.com/original/DSC_0001.jpg".into(),
            thumbnail: "https://r2.example.com/thumbnail/DSC_0001.webp".into(),
        }
    }

    #[test]
    fn test_kind_selects_source_url() {
        let photo = photo();
        let thumb = PreviewState::new(&photo, PreviewKind::Thumbnail);
        assert_eq!(thumb.source_url, photo.thumbnail);
        let original = PreviewState::new(&photo, PreviewKind::Original);
        assert_eq!(original.source_url, photo.path);
    }

    #[test]
    fn test_title_names_kind_and_file() {
        let state = PreviewState::new(&photo(), PreviewKind::Original);
        assert_eq!(state.title(), "Remote original: DSC_0001.jpg");
    }
}
