use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{ImageFormat, ImageReader, imageops::FilterType};
use std::{io::Cursor, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortraitError {
    #[error("could not open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("could not re-encode '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// What a tile shows in its portrait region.
#[derive(Clone, Debug, PartialEq)]
pub enum Portrait {
    /// PNG data URL already scaled to the portrait size.
    Embedded(String),
    Missing,
    Unreadable(String),
}

impl Portrait {
    pub fn data_url(&self) -> Option<&str> {
        match self {
            Self::Embedded(url) => Some(url),
            _ => None,
        }
    }
}

/// Decodes `path` (format sniffed from content, not extension), scales it to
/// `size`×`size` and returns it as a PNG data URL.
pub fn load_portrait(path: &Path, size: u32) -> Result<String, PortraitError> {
    let display = path.display().to_string();
    let image = ImageReader::open(path)
        .map_err(|source| PortraitError::Open {
            path: display.clone(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| PortraitError::Open {
            path: display.clone(),
            source,
        })?
        .decode()
        .map_err(|source| PortraitError::Decode {
            path: display.clone(),
            source,
        })?;

    let scaled = image.resize_exact(size, size, FilterType::Triangle);
    let mut bytes = Cursor::new(Vec::new());
    scaled
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|source| PortraitError::Encode {
            path: display,
            source,
        })?;
    Ok(format!(
        "data:image/png;base64,{}",
        BASE64.encode(bytes.into_inner())
    ))
}
