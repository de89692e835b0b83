//! # Turtle Frame Encoding Scheme
//!
//! A frame is decomposed into closed contours ("objects") walked by a turtle
//! on the pixel grid, plus a chain of single pixels no contour could enclose.
//! Decoding XORs every object's filled polygon and every single pixel onto an
//! empty canvas.
//!
//! ```text
//!  object                        object                 isolated pixels
//! ┌───────┬───────┬─────────────┬─────────┬───────┬────┬───────┬───────┬──────────────┐
//! │ x (8) │ y (8) │ commands.. ░│ ...     │ ...  ░│ .. │ x (8) │ y (8) │ dx dy dx dy..░│
//! └───────┴───────┴─────────────┴─────────┴───────┴────┴───────┴───────┴──────────────┘
//!                               ▲                                                    ▲
//!            padded to a byte ──┘                                  padded to a byte ─┘
//! ```
//!
//! The turtle starts on `(x, y)` facing down-right (heading 1). Each command
//! first turns, then moves one pixel:
//!
//! ```text
//!    5   6   7          Left135  Left90  Left45  Forward1  Right45  Right90  Right135
//!     ╲  │  ╱             +5       +6      +7       +0       +1       +2       +3
//!  4 ── ● ── 0
//!     ╱  │  ╲           ForwardN     moves N pixels, N follows as Exponential-Golomb
//!    3   2   1          ForwardMany  moves on until the start pixel is reached
//! ```
//!
//! Commands are coded with a Huffman table built from the frame's own command
//! counts. The table is not part of the output.
//!
//! Isolated pixels: the first one raw, then zig-zag Exponential-Golomb deltas
//! to the nearest remaining pixel.
//!
//! The encoding does not include size or a header.
//! The decoder MUST know the frame size and the prefix table out of band.
//! A frame that cannot be traced is replaced by an all-zero placeholder large
//! enough for any other codec to win a size comparison.

#[macro_use]
extern crate log;

pub mod bits;
pub mod chain;
pub mod config;
pub mod encoder;
mod error;
pub mod fill;
pub mod huffman;
pub mod mask;
pub mod tracer;
pub mod turtle;

pub use bits::{BitReader, BitWriter};
pub use config::EncoderConfig;
pub use encoder::{encode_frames, EncodedFrame, FrameEncoder, TracedFrame};
pub use error::{Error, Result};
pub use mask::{Bitmap, Mask, Point};
pub use turtle::{Command, TurtleObject, TurtleStep};

/// coordinates are written as 8-bit fields
const MAX_FRAME_SIDE: usize = 256;

#[cfg(test)]
static INIT: std::sync::Once = std::sync::Once::new();

/// Setup function that is only run once, even if called multiple times.
#[cfg(test)]
fn setup_logger() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}
