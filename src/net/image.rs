//! Asynchronous image fetcher.
//!
//! Spawns background threads to load post and section images (from the web or
//! the local asset directory) and decode them into RGBA pixel buffers ready
//! for egui texture creation.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use crate::error::AssetError;
use crate::net::fetch::AssetSource;

/// Widest image kept in memory; wider images are scaled down.
const MAX_WIDTH: u32 = 1200;

/// Decoded image data (RGBA).
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Manages background image fetching and decoding.
pub struct ImageLoader {
    source: AssetSource,
    pending: HashMap<String, mpsc::Receiver<Option<ImageData>>>,
    loaded: HashMap<String, ImageData>,
    failed: HashSet<String>,
}

impl ImageLoader {
    pub fn new(source: AssetSource) -> Self {
        Self {
            source,
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Request an image to be fetched in the background.
    pub fn request(&mut self, src: &str) {
        if self.loaded.contains_key(src)
            || self.pending.contains_key(src)
            || self.failed.contains(src)
        {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let src_owned = src.to_string();
        let source = self.source.clone();

        std::thread::spawn(move || {
            let result = match load_and_decode(&source, &src_owned) {
                Ok(data) => Some(data),
                Err(e) => {
                    log::warn!("Image {} unavailable: {}", src_owned, e);
                    None
                }
            };
            let _ = tx.send(result);
        });

        self.pending.insert(src.to_string(), rx);
    }

    /// Poll for completed downloads. Call every frame.
    pub fn poll(&mut self) {
        let mut completed = Vec::new();
        for (src, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Some(data)) => {
                    self.loaded.insert(src.clone(), data);
                    completed.push(src.clone());
                }
                Ok(None) | Err(mpsc::TryRecvError::Disconnected) => {
                    self.failed.insert(src.clone());
                    completed.push(src.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for src in completed {
            self.pending.remove(&src);
        }
    }

    /// Hand over a decoded image, removing it from the loader.
    /// The caller keeps the resulting texture; the pixels are not needed twice.
    pub fn take(&mut self, src: &str) -> Option<ImageData> {
        self.loaded.remove(src)
    }

    /// Sources whose pixels are ready to be taken.
    pub fn ready(&self) -> Vec<String> {
        self.loaded.keys().cloned().collect()
    }

    pub fn has_failed(&self, src: &str) -> bool {
        self.failed.contains(src)
    }

    /// Number of images still being fetched.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn load_and_decode(source: &AssetSource, src: &str) -> Result<ImageData, AssetError> {
    let bytes = source.read(src)?;
    let img = image::load_from_memory(&bytes)?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (w, h, pixels) = if w > MAX_WIDTH {
        let ratio = MAX_WIDTH as f32 / w as f32;
        let new_h = ((h as f32 * ratio) as u32).max(1);
        let resized =
            image::imageops::resize(&rgba, MAX_WIDTH, new_h, image::imageops::FilterType::Triangle);
        let (rw, rh) = resized.dimensions();
        (rw, rh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Ok(ImageData {
        width: w,
        height: h,
        rgba: pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ImageLoader::new(AssetSource::Local(dir.path().to_path_buf()));
        loader.request("/img.png");
        loader.request("/img.png");
        assert_eq!(loader.pending_count(), 1);
    }

    #[test]
    fn missing_files_fail_once_and_stay_failed() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ImageLoader::new(AssetSource::Local(dir.path().to_path_buf()));
        loader.request("/gone.png");

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while loader.pending_count() > 0 && std::time::Instant::now() < deadline {
            loader.poll();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(loader.has_failed("/gone.png"));
        assert!(loader.ready().is_empty());

        loader.request("/gone.png");
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn decodes_local_png() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(dir.path().join("tiny.png")).unwrap();

        let source = AssetSource::Local(dir.path().to_path_buf());
        let data = load_and_decode(&source, "tiny.png").unwrap();
        assert_eq!((data.width, data.height), (4, 2));
        assert_eq!(&data.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn undecodable_bytes_are_image_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        let result = load_and_decode(&AssetSource::Local(dir.path().to_path_buf()), "bad.png");
        assert!(matches!(result, Err(AssetError::Image(_))));
    }
}
