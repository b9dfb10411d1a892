//! Image store and background asset loading
//!
//! Images are registered by `ImageId` up front and filled in as the loader
//! thread delivers them. Until then `ImageStore::is_ready` reports false and
//! the simulation skips drawing that image.

pub mod bitmap;
pub mod procedural;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use gridcar_sim::ImageId;

use bitmap::DecodedBitmap;

/// Loaded images keyed by handle
#[derive(Debug, Default)]
pub struct ImageStore {
    images: HashMap<ImageId, DecodedBitmap>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ImageId, bitmap: DecodedBitmap) {
        self.images.insert(id, bitmap);
    }

    pub fn get(&self, id: ImageId) -> Option<&DecodedBitmap> {
        self.images.get(&id)
    }

    pub fn is_ready(&self, id: ImageId) -> bool {
        self.images.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

/// What to paint when the image file is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Background,
    Car,
}

impl Fallback {
    const SIZE: u32 = 64;

    fn generate(self) -> DecodedBitmap {
        match self {
            Fallback::Background => procedural::background(Self::SIZE),
            Fallback::Car => procedural::car(Self::SIZE),
        }
    }
}

/// One image to load
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub id: ImageId,
    pub path: PathBuf,
    pub fallback: Fallback,
}

/// Decode the requested file, or generate the fallback if that fails
pub fn load_or_generate(request: &AssetRequest) -> DecodedBitmap {
    match bitmap::load_image(&request.path) {
        Ok(bmp) => {
            tracing::info!(
                "Loaded {} ({}x{})",
                request.path.display(),
                bmp.width,
                bmp.height
            );
            bmp
        }
        Err(e) => {
            tracing::warn!("{}; using generated {:?} image", e, request.fallback);
            request.fallback.generate()
        }
    }
}

/// Loads images on a worker thread and hands them over through a channel
pub struct AssetLoader {
    rx: Receiver<(ImageId, DecodedBitmap)>,
    pending: usize,
    worker: Option<JoinHandle<()>>,
}

impl AssetLoader {
    pub fn spawn(requests: Vec<AssetRequest>) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let pending = requests.len();
        let worker = std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                for request in &requests {
                    let bmp = load_or_generate(request);
                    if tx.send((request.id, bmp)).is_err() {
                        // Receiver gone: the window was closed mid-load
                        return;
                    }
                }
            })
            .context("Failed to start asset loader thread")?;

        Ok(Self {
            rx,
            pending,
            worker: Some(worker),
        })
    }

    /// Move every delivered image into `store` without blocking.
    /// Returns how many arrived.
    pub fn poll(&mut self, store: &mut ImageStore) -> usize {
        let mut arrived = 0;
        while self.pending > 0 {
            match self.rx.try_recv() {
                Ok((id, bmp)) => {
                    tracing::debug!("Image {:?} ready", id);
                    store.insert(id, bmp);
                    self.pending -= 1;
                    arrived += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!(
                        "Asset loader stopped with {} image(s) outstanding",
                        self.pending
                    );
                    self.pending = 0;
                }
            }
        }
        if self.pending == 0 {
            if let Some(worker) = self.worker.take() {
                if let Err(payload) = worker.join() {
                    tracing::warn!("Asset loader thread panicked: {}", panic_message(&*payload));
                }
            }
        }
        arrived
    }

    pub fn is_done(&self) -> bool {
        self.pending == 0
    }
}

/// Best-effort text of a thread panic payload
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn missing_file_falls_back() {
        let request = AssetRequest {
            id: ImageId(0),
            path: PathBuf::from("/nonexistent/background.bmp"),
            fallback: Fallback::Background,
        };
        let bmp = load_or_generate(&request);
        assert_eq!(bmp, procedural::background(Fallback::SIZE));
    }

    #[test]
    fn loads_png_from_disk() {
        let dir = std::env::temp_dir().join("gridcar_asset_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("car.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let bmp = load_or_generate(&AssetRequest {
            id: ImageId(1),
            path,
            fallback: Fallback::Car,
        });
        assert_eq!((bmp.width, bmp.height), (1, 1));
        assert_eq!(bmp.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_ne!(bmp, procedural::car(Fallback::SIZE));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn panic_payload_text() {
        let payload = std::thread::spawn(|| panic!("decoder crashed"))
            .join()
            .unwrap_err();
        assert_eq!(panic_message(&*payload), "decoder crashed");

        let payload = std::thread::spawn(|| std::panic::panic_any(7u8))
            .join()
            .unwrap_err();
        assert_eq!(panic_message(&*payload), "unknown panic");
    }

    #[test]
    fn loader_delivers_all_requests() {
        let requests = vec![
            AssetRequest {
                id: ImageId(0),
                path: PathBuf::from("/nonexistent/a.bmp"),
                fallback: Fallback::Background,
            },
            AssetRequest {
                id: ImageId(1),
                path: PathBuf::from("/nonexistent/b.bmp"),
                fallback: Fallback::Car,
            },
        ];
        let mut loader = AssetLoader::spawn(requests).unwrap();
        let mut store = ImageStore::new();

        let deadline = Instant::now() + Duration::from_secs(10);
        while !loader.is_done() && Instant::now() < deadline {
            loader.poll(&mut store);
            std::thread::sleep(Duration::from_millis(1));
        }

        assert!(loader.is_done());
        assert!(store.is_ready(ImageId(0)));
        assert!(store.is_ready(ImageId(1)));
        assert!(!store.is_ready(ImageId(2)));
        assert_eq!(store.len(), 2);
    }
}
