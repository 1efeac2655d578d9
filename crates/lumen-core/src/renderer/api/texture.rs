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

//! Defines data structures related to GPU texture resources.

use std::borrow::Cow;
use std::fmt;

/// An opaque handle to a GPU texture object. `0` means "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

impl TextureId {
    /// The sentinel id that refers to no texture.
    pub const NONE: Self = Self(0);

    /// Returns `true` if this is the sentinel id.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// The semantic role a texture plays in a material.
///
/// The role selects the uniform the texture is bound to: the shading model
/// expects samplers named `material.<role><n>`, e.g. `material.diffuse1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKind {
    /// Base color map.
    Diffuse,
    /// Specular intensity map.
    Specular,
    /// Tangent-space normal map.
    Normal,
}

impl TextureKind {
    /// All roles, in the order a material lists them.
    pub const ALL: [TextureKind; 3] = [
        TextureKind::Diffuse,
        TextureKind::Specular,
        TextureKind::Normal,
    ];

    /// The role name used to build uniform names.
    pub const fn as_str(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "diffuse",
            TextureKind::Specular => "specular",
            TextureKind::Normal => "normal",
        }
    }

    /// Builds the uniform name of the `number`-th texture of this role
    /// (numbering starts at 1).
    pub fn uniform_name(self, number: u32) -> String {
        format!("material.{}{}", self.as_str(), number)
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel layout of uploaded texel data. Each channel is one unsigned byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// One channel.
    R8,
    /// Three channels.
    Rgb8,
    /// Four channels.
    Rgba8,
}

impl TextureFormat {
    /// Picks the format matching a decoded image's channel count.
    ///
    /// Returns `None` for channel counts that have no direct upload format.
    pub const fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(TextureFormat::R8),
            3 => Some(TextureFormat::Rgb8),
            4 => Some(TextureFormat::Rgba8),
            _ => None,
        }
    }

    /// Number of channels per texel.
    pub const fn channels(self) -> u8 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Size in bytes of one texel.
    pub const fn bytes_per_pixel(self) -> u32 {
        self.channels() as u32
    }
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    #[default]
    Repeat,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirroredRepeat,
}

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation of the four nearest texels.
    #[default]
    Linear,
}

/// A full-image upload into a 2D texture, with its sampling state.
#[derive(Debug, Clone)]
pub struct TextureUpload<'a> {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: TextureFormat,
    /// Row-major texel data, bottom row first, tightly packed.
    pub pixels: Cow<'a, [u8]>,
    /// Wrap mode for both the S and T axes.
    pub wrap: WrapMode,
    /// Filter used for magnification and (between texels) minification.
    pub filter: FilterMode,
    /// Whether the full mip chain is generated after the upload.
    pub generate_mipmaps: bool,
}

impl TextureUpload<'_> {
    /// The number of bytes `pixels` must contain.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel() as usize
    }

    /// Returns `true` when `pixels` has exactly the expected length.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_names() {
        assert_eq!(TextureKind::Diffuse.uniform_name(1), "material.diffuse1");
        assert_eq!(TextureKind::Specular.uniform_name(2), "material.specular2");
        assert_eq!(TextureKind::Normal.uniform_name(1), "material.normal1");
    }

    #[test]
    fn test_format_from_channels() {
        assert_eq!(TextureFormat::from_channels(1), Some(TextureFormat::R8));
        assert_eq!(TextureFormat::from_channels(3), Some(TextureFormat::Rgb8));
        assert_eq!(TextureFormat::from_channels(4), Some(TextureFormat::Rgba8));
        assert_eq!(TextureFormat::from_channels(2), None);
        assert_eq!(TextureFormat::from_channels(0), None);
    }

    #[test]
    fn test_upload_length_check() {
        let upload = TextureUpload {
            width: 2,
            height: 3,
            format: TextureFormat::Rgb8,
            pixels: Cow::Owned(vec![0; 18]),
            wrap: WrapMode::Repeat,
            filter: FilterMode::Linear,
            generate_mipmaps: true,
        };
        assert_eq!(upload.expected_len(), 18);
        assert!(upload.is_consistent());
    }
}
