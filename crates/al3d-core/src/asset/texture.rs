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

//! Textures whose pixels may arrive after the material that uses them.
//!
//! A texture starts out empty. Decoded pixels are handed over with
//! [`Texture::set_pixels`] (typically from a background loader) and uploaded
//! the next time the renderer calls [`Texture::ensure_uploaded`]. Until then the
//! texture reports itself as not ready and is never bound.
//!
//! [`Texture`] is a shared handle: clones refer to the same slot, so materials
//! holding clones of one texture upload and bind a single GPU texture.

use crate::renderer::{
    CubeTextureData, GraphicsContext, ResourceError, TextureData, TextureId, TextureOptions,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct TextureSlot {
    options: TextureOptions,
    id: Option<TextureId>,
    pending: Option<TextureData>,
}

/// A 2D texture slot: an optional GPU handle plus pixels waiting for upload.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    slot: Rc<RefCell<TextureSlot>>,
}

impl Texture {
    /// An empty texture that will be created with `options`.
    pub fn new(options: TextureOptions) -> Self {
        Self::with_slot(TextureSlot {
            options,
            id: None,
            pending: None,
        })
    }

    /// A texture whose pixels are already known.
    pub fn from_data(data: TextureData, options: TextureOptions) -> Self {
        Self::with_slot(TextureSlot {
            options,
            id: None,
            pending: Some(data),
        })
    }

    fn with_slot(slot: TextureSlot) -> Self {
        Self {
            slot: Rc::new(RefCell::new(slot)),
        }
    }

    /// Sampling options used when the GPU texture is created.
    pub fn options(&self) -> TextureOptions {
        self.slot.borrow().options
    }

    /// Whether `self` and `other` are handles to the same texture.
    pub fn shares_slot_with(&self, other: &Texture) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// Queues pixels for upload. On an already uploaded texture the next
    /// upload replaces its contents in place (video frames take this path).
    pub fn set_pixels(&self, data: TextureData) {
        self.slot.borrow_mut().pending = Some(data);
    }

    /// The GPU handle, once uploaded.
    pub fn id(&self) -> Option<TextureId> {
        self.slot.borrow().id
    }

    /// Whether the texture can be bound this frame, possibly after uploading pending pixels.
    pub fn is_ready(&self) -> bool {
        let slot = self.slot.borrow();
        slot.id.is_some() || slot.pending.is_some()
    }

    /// Uploads pending pixels and returns the handle to bind, or `None` if no pixels arrived yet.
    ///
    /// # Errors
    ///
    /// Propagates the context's error if creation or update fails. The pixels
    /// are dropped in that case so the failure is not retried every frame.
    pub fn ensure_uploaded(
        &self,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<Option<TextureId>, ResourceError> {
        let mut slot = self.slot.borrow_mut();
        if let Some(data) = slot.pending.take() {
            match slot.id {
                Some(id) => ctx.update_texture(id, &data)?,
                None => {
                    let id = ctx.create_texture(&data, &slot.options)?;
                    log::debug!(
                        "Texture: uploaded {}x{} texture as {:?}",
                        data.width,
                        data.height,
                        id
                    );
                    slot.id = Some(id);
                }
            }
        }
        Ok(slot.id)
    }
}

/// A cube map slot, used by the skybox.
#[derive(Debug, Clone, Default)]
pub struct CubeTexture {
    /// Sampling options used when the GPU texture is created.
    pub options: TextureOptions,
    id: Option<TextureId>,
    pending: Option<CubeTextureData>,
}

impl CubeTexture {
    /// A cube texture whose six faces are already known.
    pub fn from_data(data: CubeTextureData) -> Self {
        Self {
            options: TextureOptions {
                flip_y: false,
                ..TextureOptions::default()
            },
            id: None,
            pending: Some(data),
        }
    }

    /// Queues the six faces for upload.
    pub fn set_faces(&mut self, data: CubeTextureData) {
        self.pending = Some(data);
    }

    /// Whether the cube map can be bound this frame.
    pub fn is_ready(&self) -> bool {
        self.id.is_some() || self.pending.is_some()
    }

    /// Uploads pending faces and returns the handle to bind.
    pub fn ensure_uploaded(
        &mut self,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<Option<TextureId>, ResourceError> {
        if let Some(data) = self.pending.take() {
            self.id = Some(ctx.create_cube_texture(&data, &self.options)?);
        }
        Ok(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_texture_is_not_ready() {
        let texture = Texture::new(TextureOptions::default());
        assert!(!texture.is_ready());
        assert_eq!(texture.id(), None);
    }

    #[test]
    fn texture_with_pixels_is_ready_before_upload() {
        let texture = Texture::new(TextureOptions::default());
        texture.set_pixels(TextureData::solid([255, 0, 0, 255]));
        assert!(texture.is_ready());
        assert_eq!(texture.id(), None);
    }

    #[test]
    fn clones_share_pixels() {
        let texture = Texture::new(TextureOptions::default());
        let shared = texture.clone();
        assert!(shared.shares_slot_with(&texture));
        assert!(!Texture::default().shares_slot_with(&texture));

        texture.set_pixels(TextureData::solid([0, 0, 0, 255]));
        assert!(shared.is_ready());
    }
}
