use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("exponential-golomb code is undefined for zero")]
    ZeroGolomb,
    #[error("invalid encoder config: {0}")]
    InvalidConfig(&'static str),
    #[error("frame {width}x{height} does not fit 8-bit coordinates")]
    FrameTooLarge { width: usize, height: usize },
    #[error("bitmap is {actual_width}x{actual_height}, encoder expects {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    #[error("packed bitmap size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("coordinate ({x}, {y}) out of range")]
    CoordinateOutOfRange { x: i32, y: i32 },
    #[error("contour starting at ({x}, {y}) does not close")]
    OpenContour { x: i32, y: i32 },
    #[error("unexpected end of bit stream")]
    UnexpectedEof,
}

pub type Result<T> = std::result::Result<T, Error>;
