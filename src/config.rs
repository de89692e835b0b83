use crate::{Error, Result, MAX_FRAME_SIDE};

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 64;
/// Heading the turtle faces before its first command (down-right).
pub const DEFAULT_INITIAL_HEADING: u8 = 1;
/// Sharpest legal turn in eighth turns; 4 would be a reversal.
pub const MAX_TURN: u8 = 3;
/// Large enough that any sibling codec wins the size comparison.
pub const DEFAULT_SENTINEL_LEN: usize = 1024 * 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub width: usize,
    pub height: usize,
    pub initial_heading: u8,
    /// Turn window scanned by the tracer, `-max_turn..=max_turn`.
    pub max_turn: u8,
    /// Trace attempts per frame before the frame is abandoned.
    pub max_attempts: usize,
    pub sentinel_len: usize,
}

impl EncoderConfig {
    pub fn new(width: usize, height: usize) -> Self {
        EncoderConfig {
            width,
            height,
            max_attempts: 4 * width * height,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig("frame must not be empty"));
        }
        if self.width > MAX_FRAME_SIDE || self.height > MAX_FRAME_SIDE {
            return Err(Error::FrameTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.initial_heading >= 8 {
            return Err(Error::InvalidConfig("initial heading must be in 0..8"));
        }
        if self.max_turn == 0 || self.max_turn > MAX_TURN {
            return Err(Error::InvalidConfig("turn window must be in 1..=3"));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("attempt ceiling must be positive"));
        }
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            initial_heading: DEFAULT_INITIAL_HEADING,
            max_turn: MAX_TURN,
            max_attempts: 4 * DEFAULT_WIDTH * DEFAULT_HEIGHT,
            sentinel_len: DEFAULT_SENTINEL_LEN,
        }
    }
}
