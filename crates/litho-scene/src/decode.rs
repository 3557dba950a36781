//! Off-thread image decoding.
//!
//! Decoding a multi-megabyte upload takes long enough to drop frames, so it
//! runs on a dedicated worker. Results carry the generation stamp of their
//! request; the scene discards any result whose generation is stale, which
//! makes rapid re-uploads last-write-wins without explicit cancellation.

use std::path::PathBuf;
use std::thread::JoinHandle;

use litho_raster::{RasterError, RasterImage};

/// What to decode.
#[derive(Clone, Debug)]
pub enum DecodeSource {
    /// Read and decode a file.
    Path(PathBuf),
    /// Decode an in-memory buffer (drag-and-drop payloads, tests).
    Bytes(Vec<u8>),
}

struct DecodeRequest {
    generation: u64,
    source: DecodeSource,
}

/// A completed decode, stamped with its request generation.
pub struct DecodeResult {
    pub generation: u64,
    pub outcome: Result<RasterImage, RasterError>,
}

/// Single-worker decode pipeline.
///
/// The main thread submits sources and drains results once per frame;
/// decoding never blocks the frame loop.
pub struct DecodePipeline {
    request_sender: Option<crossbeam_channel::Sender<DecodeRequest>>,
    result_receiver: crossbeam_channel::Receiver<DecodeResult>,
    worker: Option<JoinHandle<()>>,
    generation: u64,
}

impl DecodePipeline {
    pub fn new() -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<DecodeRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let worker = std::thread::Builder::new()
            .name("litho-decode".to_string())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    let outcome = match request.source {
                        DecodeSource::Path(path) => RasterImage::from_path(&path),
                        DecodeSource::Bytes(bytes) => RasterImage::from_bytes(&bytes),
                    };
                    let _ = result_tx.send(DecodeResult {
                        generation: request.generation,
                        outcome,
                    });
                }
            })
            .expect("spawn decode worker");

        Self {
            request_sender: Some(request_tx),
            result_receiver: result_rx,
            worker: Some(worker),
            generation: 0,
        }
    }

    /// Submits a source for decoding and returns its generation stamp.
    /// Every submission supersedes all earlier ones.
    pub fn submit(&mut self, source: DecodeSource) -> u64 {
        self.generation += 1;
        let request = DecodeRequest {
            generation: self.generation,
            source,
        };
        if let Some(sender) = &self.request_sender
            && sender.send(request).is_err()
        {
            log::error!("decode worker is gone; dropping upload");
        }
        self.generation
    }

    /// Marks all in-flight work stale without submitting anything new.
    /// Used when the upload is cleared.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// The generation a result must carry to be current.
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Drain all completed decodes. Called once per frame on the main thread.
    pub fn drain(&self) -> Vec<DecodeResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            results.push(result);
        }
        results
    }

    /// Shut down the worker gracefully.
    ///
    /// Drops the request sender to close the channel, then joins the thread.
    pub fn shutdown(&mut self) {
        self.request_sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Default for DecodePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DecodePipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
