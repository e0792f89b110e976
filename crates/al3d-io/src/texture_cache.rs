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

//! Path-keyed texture sharing on top of the [`TextureStreamer`].
//!
//! Every path is decoded once. Later loads of the same path return a clone of
//! the first [`Texture`] handle, so all materials using it upload and bind a
//! single GPU texture.

use crate::error::LoadError;
use crate::streamer::{StreamId, Streamed, TextureSource, TextureStreamer};
use ahash::AHashMap;
use al3d_core::asset::Texture;
use al3d_core::renderer::TextureOptions;
use std::path::{Path, PathBuf};

/// Owns the streamer and the textures it has been asked for, keyed by path.
#[derive(Debug)]
pub struct TextureCache {
    streamer: TextureStreamer,
    entries: AHashMap<PathBuf, Texture>,
    waiting: AHashMap<StreamId, PathBuf>,
}

impl TextureCache {
    /// Starts an empty cache with its own streamer thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the streamer thread cannot be spawned.
    pub fn new() -> Result<Self, LoadError> {
        Ok(Self {
            streamer: TextureStreamer::new()?,
            entries: AHashMap::new(),
            waiting: AHashMap::new(),
        })
    }

    /// The texture for `path`, queueing a decode the first time it is asked for.
    ///
    /// The returned handle is not ready until [`poll`](Self::poll) or
    /// [`wait_all`](Self::wait_all) delivers its pixels. `options` only apply
    /// to the first load of a path.
    pub fn load(&mut self, path: impl AsRef<Path>, options: TextureOptions) -> Texture {
        let path = path.as_ref();
        if let Some(texture) = self.entries.get(path) {
            log::debug!("TextureCache: hit for '{}'", path.display());
            return texture.clone();
        }

        log::debug!("TextureCache: miss for '{}', queueing decode", path.display());
        let texture = Texture::new(options);
        let id = self
            .streamer
            .request(TextureSource::Path(path.to_path_buf()));
        self.entries.insert(path.to_path_buf(), texture.clone());
        self.waiting.insert(id, path.to_path_buf());
        texture
    }

    /// Hands every finished decode to its texture. Never blocks.
    ///
    /// Returns how many textures became ready.
    pub fn poll(&mut self) -> usize {
        self.streamer
            .poll()
            .into_iter()
            .map(|streamed| self.deliver(streamed))
            .filter(|&ready| ready)
            .count()
    }

    /// Blocks until every queued decode has finished.
    ///
    /// Returns how many textures became ready.
    pub fn wait_all(&mut self) -> usize {
        let mut ready = 0;
        while !self.waiting.is_empty() {
            let Some(streamed) = self.streamer.wait() else {
                log::warn!(
                    "TextureCache: streamer stopped with {} decodes outstanding",
                    self.waiting.len()
                );
                break;
            };
            if self.deliver(streamed) {
                ready += 1;
            }
        }
        ready
    }

    /// Number of distinct paths held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path has been loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of decodes still in flight.
    pub fn pending(&self) -> usize {
        self.waiting.len()
    }

    fn deliver(&mut self, streamed: Streamed) -> bool {
        let Some(path) = self.waiting.remove(&streamed.id) else {
            return false;
        };
        match streamed.result {
            Ok(data) => match self.entries.get(&path) {
                Some(texture) => {
                    texture.set_pixels(data);
                    true
                }
                None => false,
            },
            Err(err) => {
                // Dropped so a later load of the path retries.
                log::warn!("TextureCache: '{}' failed to load: {err}", path.display());
                self.entries.remove(&path);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture_loader::tests::png;
    use al3d_infra::HeadlessContext;

    fn write_png(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, png(2, 2, [200, 100, 50, 255])).unwrap();
        path
    }

    #[test]
    fn the_same_path_loads_one_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "crate.png");
        let mut cache = TextureCache::new().unwrap();

        let first = cache.load(&path, TextureOptions::default());
        let second = cache.load(&path, TextureOptions::default());
        assert!(first.shares_slot_with(&second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.pending(), 1);

        assert_eq!(cache.wait_all(), 1);
        assert!(first.is_ready() && second.is_ready());

        let mut ctx = HeadlessContext::new(4, 4);
        let a = first.ensure_uploaded(&mut ctx).unwrap();
        let b = second.ensure_uploaded(&mut ctx).unwrap();
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(ctx.texture_count(), 1);
    }

    #[test]
    fn different_paths_get_their_own_texture() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = TextureCache::new().unwrap();
        let wood = cache.load(write_png(&dir, "wood.png"), TextureOptions::default());
        let stone = cache.load(write_png(&dir, "stone.png"), TextureOptions::default());
        assert!(!wood.shares_slot_with(&stone));
        assert_eq!(cache.wait_all(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_paths_are_evicted_and_retried() {
        let mut cache = TextureCache::new().unwrap();
        let missing = Path::new("/no/such/texture.png");
        let texture = cache.load(missing, TextureOptions::default());
        assert_eq!(cache.wait_all(), 0);
        assert!(!texture.is_ready());
        assert!(cache.is_empty());

        let retry = cache.load(missing, TextureOptions::default());
        assert!(!retry.shares_slot_with(&texture));
        assert_eq!(cache.pending(), 1);
    }
}
