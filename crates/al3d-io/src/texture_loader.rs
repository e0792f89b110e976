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

//! Texture decoding on the CPU.

use crate::error::LoadError;
use al3d_core::asset::AssetLoader;
use al3d_core::renderer::{CubeTextureData, TextureData};
use std::path::Path;

/// Decodes any format the `image` crate recognizes into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<TextureData, LoadError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Reads and decodes an image file.
pub fn load_image_file(path: impl AsRef<Path>) -> Result<TextureData, LoadError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_image(&bytes)
}

/// Decodes six cube faces given in `+X, -X, +Y, -Y, +Z, -Z` order.
pub fn decode_cube_faces(faces: [&[u8]; 6]) -> Result<CubeTextureData, LoadError> {
    let [px, nx, py, ny, pz, nz] = faces;
    Ok(CubeTextureData {
        faces: [
            decode_image(px)?,
            decode_image(nx)?,
            decode_image(py)?,
            decode_image(ny)?,
            decode_image(pz)?,
            decode_image(nz)?,
        ],
    })
}

/// An [`AssetLoader`] decoding encoded images.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTextureLoader;

impl AssetLoader<TextureData> for ImageTextureLoader {
    fn load(&self, bytes: &[u8]) -> Result<TextureData, Box<dyn std::error::Error + Send + Sync>> {
        Ok(decode_image(bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_to_rgba8() {
        let texture = decode_image(&png(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.pixels.len(), 3 * 2 * 4);
        assert_eq!(&texture.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            decode_image(b"not an image"),
            Err(LoadError::Image(_))
        ));
        assert!(ImageTextureLoader.load(b"").is_err());
    }

    #[test]
    fn cube_faces_keep_their_order() {
        let colors: [[u8; 4]; 6] = std::array::from_fn(|i| [i as u8 * 40, 0, 0, 255]);
        let encoded: Vec<Vec<u8>> = colors.iter().map(|&c| png(2, 2, c)).collect();
        let faces: [&[u8]; 6] = std::array::from_fn(|i| encoded[i].as_slice());
        let cube = decode_cube_faces(faces).unwrap();
        for (face, color) in cube.faces.iter().zip(colors) {
            assert_eq!(&face.pixels[..4], &color);
        }
    }
}
