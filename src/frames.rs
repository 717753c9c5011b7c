//! Frame image discovery
//!
//! A frame directory is a flat folder of JPEG stills named so that sorting by
//! name gives playback order, for example `clip_0001.jpg`, `clip_0002.jpg`.
//! The digits ending the first file name give the number of the first
//! frame; numbers increase by one per file from there.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info};

use crate::cache::FrameImageCache;
use crate::config::Config;
use crate::error::{Error, IoOperation, Result};

static FRAME_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<number>\d+)\.[a-z]{1,4}$").expect("frame number pattern is valid")
});

/// Raw bytes of one frame image. Decoding is left to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// An ordered frame sequence backed by a shared [`FrameImageCache`]
#[derive(Debug)]
pub struct FrameDirectory {
    dir: PathBuf,
    files: Arc<[PathBuf]>,
    first_frame: u32,
    cache: Arc<FrameImageCache<FrameImage>>,
}

/// Parse the frame number at the end of a file name
pub fn frame_number(file_name: &str) -> Result<u32> {
    FRAME_NUMBER
        .captures(file_name)
        .and_then(|caps| caps["number"].parse().ok())
        .ok_or_else(|| Error::BadFrameName {
            name: file_name.to_string(),
        })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

fn list_frames(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(Error::io(IoOperation::ListDirectory, dir))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(Error::io(IoOperation::ListDirectory, dir))?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

impl FrameDirectory {
    /// Scan `dir` for frame images.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be listed, holds no frame images, or the
    /// first image's name does not end in a number.
    pub fn open(dir: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let dir = dir.as_ref();
        let files: Arc<[PathBuf]> = list_frames(dir, &config.frame_extensions)?.into();
        let first = files.first().ok_or_else(|| Error::NoFrames {
            dir: dir.to_path_buf(),
        })?;
        let first_name = first
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let first_frame = frame_number(&first_name)?;

        let loader_files = Arc::clone(&files);
        let cache = FrameImageCache::with_capacity(config.cache_capacity, move |index: usize| -> io::Result<FrameImage> {
            let path = loader_files.get(index).ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no frame image at index {index}"))
            })?;
            debug!("Reading frame image {}", path.display());
            fs::read(path).map(|bytes| FrameImage {
                path: path.clone(),
                bytes,
            })
        });

        info!(
            "Found {} frames in {} starting at frame {}",
            files.len(),
            dir.display(),
            first_frame
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            first_frame,
            cache: Arc::new(cache),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn first_frame(&self) -> u32 {
        self.first_frame
    }

    #[must_use]
    pub fn last_frame(&self) -> u32 {
        let extra = u32::try_from(self.files.len().saturating_sub(1)).unwrap_or(u32::MAX);
        self.first_frame.saturating_add(extra)
    }

    /// Cache index of `frame`
    pub fn index_of(&self, frame: u32) -> Result<usize> {
        if frame < self.first_frame || frame > self.last_frame() {
            return Err(Error::FrameOutOfRange {
                first: self.first_frame,
                requested: frame,
                last: self.last_frame(),
            });
        }
        Ok((frame - self.first_frame) as usize)
    }

    /// Image file for `frame`
    pub fn path(&self, frame: u32) -> Result<&Path> {
        Ok(&self.files[self.index_of(frame)?])
    }

    /// Image for `frame`, loaded through the cache.
    ///
    /// `Ok(None)` means the file exists in the sequence but could not be
    /// read; the failure went to the cache's diagnostic sink.
    pub fn image(&self, frame: u32) -> Result<Option<Arc<FrameImage>>> {
        Ok(self.cache.get(self.index_of(frame)?))
    }

    /// Like [`image`](Self::image) but surfaces read failures
    pub fn try_image(&self, frame: u32) -> Result<Arc<FrameImage>> {
        self.cache.try_get(self.index_of(frame)?)
    }

    /// Shared cache, for prefetching or memory-pressure reclamation
    #[must_use]
    pub fn cache(&self) -> Arc<FrameImageCache<FrameImage>> {
        Arc::clone(&self.cache)
    }
}
