//! Image assets for the image questions.
//!
//! A tag maps to `/pics/<name>.jpeg`, where the name is the tag lower-cased
//! with each whitespace run replaced by `_` and `&` spelled `and`.

use std::path::PathBuf;

/// URL prefix the image directory is served under
pub const IMAGE_URL_PREFIX: &str = "/pics";

/// Shown when a tag has no image on disk
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// File stem for a tag, e.g. "Strategic Combat" -> "strategic_combat"
pub fn image_file_stem(tag: &str) -> String {
    let mut stem = String::with_capacity(tag.len());
    let mut in_whitespace = false;

    for c in tag.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        match c {
            '&' => stem.push_str("and"),
            _ => stem.extend(c.to_lowercase()),
        }
    }
    stem
}

/// URL of a tag's image, whether or not the file exists
pub fn image_url(tag: &str) -> String {
    format!("{}/{}.jpeg", IMAGE_URL_PREFIX, image_file_stem(tag))
}

/// Resolves tag images against a directory on disk.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    dir: PathBuf,
}

impl ImageResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The image URL if the file exists, the placeholder otherwise
    pub fn url_for(&self, tag: &str) -> String {
        let file = self.dir.join(format!("{}.jpeg", image_file_stem(tag)));
        if file.is_file() {
            image_url(tag)
        } else {
            PLACEHOLDER_IMAGE.to_string()
        }
    }
}
