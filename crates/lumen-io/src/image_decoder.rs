// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Image decoding for textures.
//!
//! Decoded images are row-major and flipped vertically, so the first row in
//! memory is the bottom row of the picture, which is where OpenGL expects
//! texture coordinate `v = 0`.

use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while decoding an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file could not be opened or decoded.
    #[error("Failed to decode image '{path}': {source}")]
    File {
        /// The image file.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },
    /// In-memory bytes could not be decoded.
    #[error("Failed to decode image from memory: {0}")]
    Memory(#[source] image::ImageError),
}

/// CPU-side pixels ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel: 1, 3 or 4.
    pub channels: u8,
    /// Tightly packed 8-bit pixels, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
}

/// Decodes an image file.
pub fn decode_file(path: &Path) -> Result<DecodedImage, ImageError> {
    let img = image::open(path).map_err(|source| ImageError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(into_decoded(img))
}

/// Decodes encoded image bytes (PNG, JPEG, ...), guessing the format from the content.
pub fn decode_memory(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    let img = image::load_from_memory(bytes).map_err(ImageError::Memory)?;
    Ok(into_decoded(img))
}

/// Flips and narrows a decoded image to one of the three uploadable layouts.
///
/// Grey-alpha and any higher bit depth are widened or narrowed to 8 bits;
/// images with an alpha channel end up as RGBA, the rest as grey or RGB.
fn into_decoded(img: DynamicImage) -> DecodedImage {
    let img = img.flipv();
    let (width, height) = (img.width(), img.height());
    let (channels, pixels) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other @ DynamicImage::ImageLuma16(_) => (1, other.to_luma8().into_raw()),
        other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
        other => (3, other.to_rgb8().into_raw()),
    };
    DecodedImage {
        width,
        height,
        channels,
        pixels,
    }
}
