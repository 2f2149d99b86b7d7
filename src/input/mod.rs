use std::path::Path;

use thiserror::Error;

pub mod source;
pub mod tiff_stack;

use source::read_stack_bytes;
use tiff_stack::decode_tiff_stack;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),
}

/// One decoded acquisition time point, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: Vec<f32>) -> Result<Self, InputError> {
        if width == 0 || height == 0 {
            return Err(InputError::InvalidInput(format!(
                "frame has no pixels ({width}x{height})"
            )));
        }
        if pixels.len() != width * height {
            return Err(InputError::InvalidInput(format!(
                "frame buffer holds {} samples, expected {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn n_pixels(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// Frames of one acquisition in acquisition order. Never empty, all frames share one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    pub fn new(frames: Vec<Frame>) -> Result<Self, InputError> {
        let Some(first) = frames.first() else {
            return Err(InputError::InvalidInput("stack has no frames".to_string()));
        };
        let shape = (first.width, first.height);
        for (idx, frame) in frames.iter().enumerate() {
            if (frame.width, frame.height) != shape {
                return Err(InputError::InvalidInput(format!(
                    "frame {} is {}x{}, stack shape is {}x{}",
                    idx, frame.width, frame.height, shape.0, shape.1
                )));
            }
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_shape(&self) -> (usize, usize) {
        let first = &self.frames[0];
        (first.width, first.height)
    }
}

/// Where the pipeline gets its stacks from.
pub trait StackSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load(&self, path: &Path) -> Result<Stack, InputError>;
}

/// Multi-page TIFF files on disk, optionally gzip-compressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffStackSource;

impl StackSource for TiffStackSource {
    fn load(&self, path: &Path) -> Result<Stack, InputError> {
        load_stack(path)
    }
}

pub fn load_stack(path: &Path) -> Result<Stack, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(path.display().to_string()));
    }
    let bytes = read_stack_bytes(path)?;
    let stack = decode_tiff_stack(bytes.as_ref())?;
    let (width, height) = stack.frame_shape();
    tracing::debug!(
        "decoded {}: {} frame(s) of {}x{}",
        path.display(),
        stack.len(),
        width,
        height
    );
    Ok(stack)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
