use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Default side of generated thumbnails (square bound)
pub const THUMBNAIL_SIZE: u32 = 256;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Task join error: {0}")]
    Join(String),
}

/// Decode downloaded image bytes, fit them into `size`×`size` and re-encode as PNG
pub fn make_thumbnail(data: &[u8], size: u32) -> Result<Vec<u8>, ThumbnailError> {
    let img = image::load_from_memory(data).map_err(ThumbnailError::Decode)?;

    // Resize keeps the aspect ratio
    let thumbnail = img.resize(size, size, FilterType::Lanczos3);

    let mut out = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut out, ImageFormat::Png)
        .map_err(ThumbnailError::Encode)?;
    Ok(out.into_inner())
}

/// Same as [`make_thumbnail`], off the async runtime's worker threads
pub async fn make_thumbnail_async(data: Vec<u8>, size: u32) -> Result<Vec<u8>, ThumbnailError> {
    // Spawn blocking because decoding and Lanczos resampling are CPU-intensive
    tokio::task::spawn_blocking(move || make_thumbnail(&data, size))
        .await
        .map_err(|e| ThumbnailError::Join(e.to_string()))?
}
