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

//! Background texture decoding.
//!
//! The render loop never waits on a texture: it queues a request, keeps
//! drawing with the texture marked as not ready, and on a later frame drains
//! finished decodes with [`TextureStreamer::poll`] and hands the pixels to
//! [`Texture::set_pixels`](al3d_core::asset::Texture::set_pixels).

use crate::error::LoadError;
use crate::texture_loader::{decode_image, load_image_file};
use al3d_core::renderer::TextureData;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

/// Identifies a request so its result can be matched to the texture waiting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u64);

/// Where the encoded image comes from.
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// A file on disk.
    Path(PathBuf),
    /// Bytes already in memory (fetched over the network, embedded, ...).
    Bytes(Vec<u8>),
}

/// A finished request.
#[derive(Debug)]
pub struct Streamed {
    /// The id returned by [`TextureStreamer::request`].
    pub id: StreamId,
    /// The decoded pixels, or why decoding failed.
    pub result: Result<TextureData, LoadError>,
}

/// A worker thread decoding textures off the render loop.
///
/// Requests are processed in order. Dropping the streamer closes the queue and
/// joins the worker after it finishes the request in progress.
#[derive(Debug)]
pub struct TextureStreamer {
    requests: Option<flume::Sender<(StreamId, TextureSource)>>,
    results: flume::Receiver<Streamed>,
    worker: Option<JoinHandle<()>>,
    next_id: u64,
}

impl TextureStreamer {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn new() -> Result<Self, LoadError> {
        let (request_tx, request_rx) = flume::unbounded::<(StreamId, TextureSource)>();
        let (result_tx, result_rx) = flume::unbounded();
        let worker = thread::Builder::new()
            .name("al3d-texture-streamer".to_owned())
            .spawn(move || {
                for (id, source) in request_rx.iter() {
                    let result = match source {
                        TextureSource::Path(path) => load_image_file(&path),
                        TextureSource::Bytes(bytes) => decode_image(&bytes),
                    };
                    match &result {
                        Ok(data) => log::debug!(
                            "TextureStreamer: {id:?} decoded ({}x{})",
                            data.width,
                            data.height
                        ),
                        Err(err) => log::warn!("TextureStreamer: {id:?} failed: {err}"),
                    }
                    if result_tx.send(Streamed { id, result }).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
            next_id: 0,
        })
    }

    /// Queues a decode and returns the id its result will carry.
    pub fn request(&mut self, source: TextureSource) -> StreamId {
        let id = StreamId(self.next_id);
        self.next_id += 1;
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|requests| requests.send((id, source)).is_ok());
        if !sent {
            log::warn!("TextureStreamer: worker is gone, {id:?} will never complete");
        }
        id
    }

    /// Every request finished since the last poll. Never blocks.
    pub fn poll(&self) -> Vec<Streamed> {
        self.results.try_iter().collect()
    }

    /// Blocks until the next result arrives. Returns `None` once the worker has exited.
    pub fn wait(&self) -> Option<Streamed> {
        self.results.recv().ok()
    }
}

impl Drop for TextureStreamer {
    fn drop(&mut self) {
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("TextureStreamer: worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture_loader::tests::png;
    use al3d_core::asset::Texture;
    use al3d_core::renderer::TextureOptions;

    #[test]
    fn results_arrive_in_request_order() {
        let mut streamer = TextureStreamer::new().unwrap();
        let first = streamer.request(TextureSource::Bytes(png(2, 2, [255, 0, 0, 255])));
        let second = streamer.request(TextureSource::Bytes(b"broken".to_vec()));

        let a = streamer.wait().unwrap();
        let b = streamer.wait().unwrap();
        assert_eq!((a.id, b.id), (first, second));
        assert_eq!(a.result.unwrap().width, 2);
        assert!(matches!(b.result, Err(LoadError::Image(_))));
        assert!(streamer.poll().is_empty());
    }

    #[test]
    fn streamed_pixels_make_a_texture_ready() {
        let mut streamer = TextureStreamer::new().unwrap();
        let texture = Texture::new(TextureOptions::default());
        assert!(!texture.is_ready());

        streamer.request(TextureSource::Bytes(png(1, 1, [0, 0, 0, 255])));
        let streamed = streamer.wait().unwrap();
        texture.set_pixels(streamed.result.unwrap());
        assert!(texture.is_ready());
    }

    #[test]
    fn missing_files_report_io_errors() {
        let mut streamer = TextureStreamer::new().unwrap();
        streamer.request(TextureSource::Path(PathBuf::from("/no/such/texture.png")));
        assert!(matches!(
            streamer.wait().map(|s| s.result),
            Some(Err(LoadError::Io(_)))
        ));
    }
}
