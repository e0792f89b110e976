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

use super::geometry::{Geometry, GeometryBuffers};
use super::object3d::Object3D;
use super::primitives;
use crate::asset::CubeTexture;
use crate::math::{Mat4, Vec3};
use crate::renderer::{GraphicsContext, ResourceError};

/// A cube-mapped box drawn behind everything else.
///
/// Its vertex shader writes `xyww`, so every fragment lands on the far plane.
#[derive(Debug)]
pub struct SkyBox {
    /// Scale of the box; its position follows the camera.
    pub object: Object3D,
    /// The six faces, in `+X, -X, +Y, -Y, +Z, -Z` order.
    pub texture: CubeTexture,
    geometry: Geometry,
    buffers: Option<GeometryBuffers>,
}

impl SkyBox {
    /// A skybox over a unit-scale cube of side 2.
    pub fn new(texture: CubeTexture) -> Self {
        Self {
            object: Object3D {
                scale: Vec3::ONE,
                ..Object3D::default()
            },
            texture,
            geometry: primitives::cube(2.0),
            buffers: None,
        }
    }

    /// The model matrix, centred on `eye`.
    pub fn transform_around(&self, eye: Vec3) -> Mat4 {
        let mut object = self.object;
        object.position = eye;
        object.transform()
    }

    /// Uploads the cube positions if needed and returns the buffers.
    pub fn ensure_buffers(
        &mut self,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<GeometryBuffers, ResourceError> {
        if let Some(buffers) = self.buffers {
            return Ok(buffers);
        }
        let buffers = GeometryBuffers::upload(
            ctx,
            &self.geometry.vertices,
            None,
            None,
            &self.geometry.indices,
        )?;
        self.buffers = Some(buffers);
        Ok(buffers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CubeTextureData, TextureData};

    #[test]
    fn skybox_follows_the_eye() {
        let faces = std::array::from_fn(|_| TextureData::solid([0, 0, 255, 255]));
        let skybox = SkyBox::new(CubeTexture::from_data(CubeTextureData { faces }));
        assert!(skybox.texture.is_ready());
        let eye = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(skybox.transform_around(eye).translation(), eye);
    }
}
