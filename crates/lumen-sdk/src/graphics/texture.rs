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

use super::TextureError;
use lumen_core::renderer::api::{
    FilterMode, TextureFormat, TextureId, TextureKind, TextureUpload, WrapMode,
};
use lumen_core::renderer::GraphicsDevice;
use lumen_io::image_decoder::{self, DecodedImage};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Lifecycle of a [`Texture`]. `Empty` moves to `Loaded` or `Failed` once
/// and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureState {
    /// Allocated, no image uploaded.
    #[default]
    Empty,
    /// An image was uploaded.
    Loaded,
    /// Decoding or uploading failed.
    Failed,
}

/// A 2D texture object tagged with the role it plays in a material.
///
/// Textures are the one resource meshes share: a model load wraps each
/// decoded image in an `Rc` and hands clones to every mesh using it.
pub struct Texture {
    device: Rc<dyn GraphicsDevice>,
    id: TextureId,
    width: u32,
    height: u32,
    channels: u8,
    kind: TextureKind,
    state: TextureState,
    path: Option<PathBuf>,
}

impl Texture {
    /// Allocates a 0x0 texture in the `Empty` state.
    pub fn empty(device: Rc<dyn GraphicsDevice>, kind: TextureKind) -> Result<Self, TextureError> {
        let id = device.create_texture()?;
        Ok(Self {
            device,
            id,
            width: 0,
            height: 0,
            channels: 0,
            kind,
            state: TextureState::Empty,
            path: None,
        })
    }

    /// Decodes and uploads an image file.
    ///
    /// On failure the texture object is released before the error is returned.
    pub fn from_file(
        device: Rc<dyn GraphicsDevice>,
        path: impl AsRef<Path>,
        kind: TextureKind,
    ) -> Result<Self, TextureError> {
        let mut texture = Self::empty(device, kind)?;
        texture.load(path)?;
        Ok(texture)
    }

    /// Decodes and uploads an encoded image held in memory.
    pub fn from_memory(
        device: Rc<dyn GraphicsDevice>,
        bytes: &[u8],
        kind: TextureKind,
    ) -> Result<Self, TextureError> {
        let mut texture = Self::empty(device, kind)?;
        texture.load_memory(bytes)?;
        Ok(texture)
    }

    /// Uploads raw 8-bit pixels, bottom row first.
    pub fn from_data(
        device: Rc<dyn GraphicsDevice>,
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
        kind: TextureKind,
    ) -> Result<Self, TextureError> {
        let mut texture = Self::empty(device, kind)?;
        texture.load_data(width, height, channels, pixels)?;
        Ok(texture)
    }

    /// Decodes the image at `path` (flipped vertically) and uploads it with
    /// repeat wrapping, linear filtering and a full mip chain.
    ///
    /// ## Errors
    /// * `TextureError::InvalidState` - If the texture is not `Empty`.
    /// * `TextureError::Decode` - If the file is missing or not a supported image.
    ///   The texture becomes `Failed` and nothing is uploaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), TextureError> {
        let path = path.as_ref();
        self.ensure_empty()?;
        let image = self.decode(|| image_decoder::decode_file(path))?;
        self.upload_decoded(&image)?;
        self.path = Some(path.to_path_buf());
        log::debug!(
            "Loaded {} texture '{}' ({}x{}, {} channel(s))",
            self.kind,
            path.display(),
            self.width,
            self.height,
            self.channels
        );
        Ok(())
    }

    /// Same as [`load`](Self::load) for encoded bytes.
    pub fn load_memory(&mut self, bytes: &[u8]) -> Result<(), TextureError> {
        self.ensure_empty()?;
        let image = self.decode(|| image_decoder::decode_memory(bytes))?;
        self.upload_decoded(&image)
    }

    /// Uploads raw pixels. `channels` must be 1, 3 or 4.
    pub fn load_data(
        &mut self,
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
    ) -> Result<(), TextureError> {
        self.ensure_empty()?;
        let result = self.upload(width, height, channels, pixels);
        self.state = match result {
            Ok(()) => TextureState::Loaded,
            Err(_) => TextureState::Failed,
        };
        result
    }

    /// Activates unit `unit` and binds this texture to it.
    ///
    /// Binding an `Empty` or `Failed` texture is allowed; the shader then
    /// samples undefined content.
    pub fn bind_unit(&self, unit: u32) {
        self.device.bind_texture_unit(unit, self.id);
    }

    /// Moves the texture object into a new wrapper, leaving this one empty.
    pub fn take(&mut self) -> Self {
        Self {
            device: Rc::clone(&self.device),
            id: std::mem::take(&mut self.id),
            width: std::mem::take(&mut self.width),
            height: std::mem::take(&mut self.height),
            channels: std::mem::take(&mut self.channels),
            kind: self.kind,
            state: std::mem::take(&mut self.state),
            path: self.path.take(),
        }
    }

    /// The driver handle, [`TextureId::NONE`] when moved from.
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width in pixels, 0 until loaded.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, 0 until loaded.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels per pixel of the uploaded image, 0 until loaded.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// The material role.
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    /// Where the texture is in its lifecycle.
    pub fn state(&self) -> TextureState {
        self.state
    }

    /// The file the image came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_empty(&self) -> Result<(), TextureError> {
        match self.state {
            TextureState::Empty => Ok(()),
            state => Err(TextureError::InvalidState(state)),
        }
    }

    fn decode<E>(
        &mut self,
        decode: impl FnOnce() -> Result<DecodedImage, E>,
    ) -> Result<DecodedImage, TextureError>
    where
        TextureError: From<E>,
    {
        decode().map_err(|err| {
            self.state = TextureState::Failed;
            TextureError::from(err)
        })
    }

    fn upload_decoded(&mut self, image: &DecodedImage) -> Result<(), TextureError> {
        self.load_data(image.width, image.height, image.channels, &image.pixels)
    }

    fn upload(
        &mut self,
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
    ) -> Result<(), TextureError> {
        let format = TextureFormat::from_channels(channels)
            .ok_or(TextureError::UnsupportedChannels(channels))?;
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        if self.id.is_none() {
            self.id = self.device.create_texture()?;
        }
        self.device.upload_texture(
            self.id,
            &TextureUpload {
                width,
                height,
                format,
                pixels: Cow::Borrowed(pixels),
                wrap: WrapMode::Repeat,
                filter: FilterMode::Linear,
                generate_mipmaps: true,
            },
        )?;
        self.width = width;
        self.height = height;
        self.channels = channels;
        Ok(())
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("size", &(self.width, self.height))
            .field("channels", &self.channels)
            .field("state", &self.state)
            .field("path", &self.path)
            .finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if !self.id.is_none() {
            self.device.destroy_texture(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::testing::headless;
    use lumen_infra::DeviceCommand;

    #[test]
    fn test_from_data_uploads_with_sampling_state() {
        let (device, shared) = headless();
        let texture =
            Texture::from_data(shared, 2, 2, 3, &[255; 12], TextureKind::Diffuse).unwrap();
        assert_eq!(texture.state(), TextureState::Loaded);
        assert_eq!((texture.width(), texture.height(), texture.channels()), (2, 2, 3));

        let info = device.texture_info(texture.id()).unwrap();
        assert_eq!(info.format, Some(TextureFormat::Rgb8));
        assert!(info.mipmapped);
        assert_eq!(info.wrap, WrapMode::Repeat);
        assert_eq!(info.filter, FilterMode::Linear);
    }

    #[test]
    fn test_format_follows_channel_count() {
        let (device, shared) = headless();
        let gray =
            Texture::from_data(shared.clone(), 1, 1, 1, &[9], TextureKind::Specular).unwrap();
        let rgba = Texture::from_data(shared, 1, 1, 4, &[1, 2, 3, 4], TextureKind::Normal).unwrap();
        assert_eq!(
            device.texture_info(gray.id()).unwrap().format,
            Some(TextureFormat::R8)
        );
        assert_eq!(
            device.texture_info(rgba.id()).unwrap().format,
            Some(TextureFormat::Rgba8)
        );
    }

    #[test]
    fn test_size_mismatch_fails() {
        let (_device, shared) = headless();
        let mut texture = Texture::empty(shared, TextureKind::Diffuse).unwrap();
        let err = texture.load_data(4, 4, 3, &[0; 10]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::SizeMismatch {
                expected: 48,
                actual: 10
            }
        ));
        assert_eq!(texture.state(), TextureState::Failed);
    }

    #[test]
    fn test_two_channels_are_unsupported() {
        let (_device, shared) = headless();
        let err = Texture::from_data(shared, 1, 1, 2, &[0, 0], TextureKind::Diffuse).unwrap_err();
        assert!(matches!(err, TextureError::UnsupportedChannels(2)));
    }

    #[test]
    fn test_decode_failure_marks_failed_and_uploads_nothing() {
        let (device, shared) = headless();
        let mut texture = Texture::empty(shared, TextureKind::Diffuse).unwrap();
        device.clear_commands();

        let err = texture.load_memory(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
        assert_eq!(texture.state(), TextureState::Failed);
        assert!(device.commands().is_empty());

        // A failed texture can still be bound.
        texture.bind_unit(0);
        assert_eq!(device.texture_in_unit(0), texture.id());
    }

    #[test]
    fn test_missing_file_releases_the_handle() {
        let (device, shared) = headless();
        let err = Texture::from_file(shared, "/nonexistent/albedo.png", TextureKind::Diffuse)
            .unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
        assert_eq!(device.live_textures(), 0);
    }

    #[test]
    fn test_path_is_recorded_only_after_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albedo.png");
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();
        let (device, shared) = headless();

        let loaded = Texture::from_file(Rc::clone(&shared), &path, TextureKind::Diffuse).unwrap();
        assert_eq!(loaded.path(), Some(path.as_path()));

        // The image decodes but the device no longer knows the handle.
        let mut rejected = Texture::empty(Rc::clone(&shared), TextureKind::Diffuse).unwrap();
        shared.destroy_texture(rejected.id());
        let err = rejected.load(&path).unwrap_err();
        assert!(matches!(err, TextureError::Resource(_)), "{err}");
        assert_eq!(rejected.state(), TextureState::Failed);
        assert_eq!(rejected.path(), None);
        drop(rejected);
        assert_eq!(device.invalid_releases(), 1);
    }

    #[test]
    fn test_loaded_texture_cannot_be_reloaded() {
        let (_device, shared) = headless();
        let mut texture =
            Texture::from_data(shared, 1, 1, 1, &[0], TextureKind::Diffuse).unwrap();
        let err = texture.load_data(1, 1, 1, &[1]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::InvalidState(TextureState::Loaded)
        ));
    }

    #[test]
    fn test_bind_unit_is_one_call() {
        let (device, shared) = headless();
        let texture = Texture::from_data(shared, 1, 1, 1, &[0], TextureKind::Diffuse).unwrap();
        device.clear_commands();
        texture.bind_unit(3);
        assert_eq!(
            device.commands(),
            vec![DeviceCommand::BindTextureUnit {
                unit: 3,
                id: texture.id()
            }]
        );
        assert_eq!(device.active_texture_unit(), 3);
    }

    #[test]
    fn test_take_leaves_an_empty_texture() {
        let (device, shared) = headless();
        let mut texture =
            Texture::from_data(shared, 1, 1, 3, &[0, 0, 0], TextureKind::Specular).unwrap();
        let moved = texture.take();
        assert_eq!(texture.id(), TextureId::NONE);
        assert_eq!(texture.state(), TextureState::Empty);
        assert_eq!(moved.state(), TextureState::Loaded);
        assert_eq!(moved.kind(), TextureKind::Specular);
        drop(texture);
        assert_eq!(device.live_textures(), 1);
        drop(moved);
        assert_eq!(device.live_textures(), 0);
        assert_eq!(device.invalid_releases(), 0);
    }
}
