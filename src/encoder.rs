use crate::bits::BitWriter;
use crate::chain::{write_coordinate, write_isolated_pixels};
use crate::config::EncoderConfig;
use crate::fill::fill_object;
use crate::huffman::{CommandHistogram, PrefixTable};
use crate::mask::{Bitmap, Mask, Point};
use crate::tracer::{TraceOutcome, Tracer};
use crate::turtle::{Command, TurtleObject};
use crate::{Error, Result};
use rayon::prelude::*;
use std::{fmt, io};

/// Everything the tracer found in one frame, before serialization.
#[derive(Debug, Clone)]
pub struct TracedFrame {
    pub objects: Vec<TurtleObject>,
    /// Pixels flipped one by one, in row-major order.
    pub isolated: Vec<Point>,
    pub histogram: CommandHistogram,
    pub attempts: usize,
}

/// One encoded frame. There is no header; `is_fallback` is the only way to
/// tell a real encoding from the oversized placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    data: Vec<u8>,
    fallback: bool,
}

impl EncodedFrame {
    fn sentinel(len: usize) -> Self {
        EncodedFrame {
            data: vec![0; len],
            fallback: true,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for EncodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fallback {
            return write!(f, "EncodedFrame(fallback, {} bytes)", self.data.len());
        }
        write!(f, "EncodedFrame({})", hex::encode(&self.data))
    }
}

/// Start coordinate, prefix-coded commands with Exponential-Golomb run
/// lengths after `ForwardN`, then padding to the next byte.
pub fn write_object<W: io::Write>(
    writer: &mut BitWriter<W>,
    table: &PrefixTable,
    object: &TurtleObject,
) -> Result<()> {
    write_coordinate(writer, object.start)?;
    for step in &object.steps {
        table.write_command(writer, step.command)?;
        if step.command == Command::ForwardN {
            writer.write_exponential_golomb(step.run)?;
        }
    }
    writer.write_to_byte_boundary()
}

pub struct FrameEncoder {
    config: EncoderConfig,
}

impl FrameEncoder {
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(FrameEncoder { config })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn check_dimensions(&self, bitmap: &Bitmap) -> Result<()> {
        if bitmap.width() != self.config.width || bitmap.height() != self.config.height {
            return Err(Error::DimensionMismatch {
                width: self.config.width,
                height: self.config.height,
                actual_width: bitmap.width(),
                actual_height: bitmap.height(),
            });
        }
        Ok(())
    }

    /// Trace objects until coverage matches `bitmap`.
    ///
    /// Returns `None` when the attempt ceiling is reached first.
    pub fn trace(&self, bitmap: &Bitmap) -> Result<Option<TracedFrame>> {
        self.check_dimensions(bitmap)?;
        let (width, height) = (self.config.width, self.config.height);

        let mut coverage = Mask::new(width, height);
        // snaking pixels flipped in `coverage` to steer the current start
        let mut blocked = Mask::new(width, height);
        let mut isolated = Mask::new(width, height);
        let mut objects = vec![];
        let mut histogram = CommandHistogram::default();
        let mut last_start = None;
        let mut attempts = 0;

        loop {
            let Some(start) = bitmap.first_difference(&coverage) else {
                if blocked.is_empty() {
                    break;
                }
                coverage ^= &blocked;
                blocked.clear();
                last_start = None;
                continue;
            };
            if attempts == self.config.max_attempts {
                warn!("couldn't encode frame within {attempts} attempts, discarding");
                return Ok(None);
            }
            attempts += 1;

            if last_start != Some(start) {
                trace!("new start pixel {start:?}, dropping blocked pixels");
                coverage ^= &blocked;
                blocked.clear();
            }
            last_start = Some(start);

            let source = bitmap ^ &coverage;
            match Tracer::new(&self.config, &source, start).trace() {
                TraceOutcome::Closed(object) => {
                    let filled =
                        fill_object(&object, self.config.initial_heading, width, height)?;
                    debug!(
                        "object at {start:?}: {} steps, {} pixels",
                        object.steps.len(),
                        filled.count_ones()
                    );
                    coverage ^= &filled;
                    histogram.add(&object);
                    objects.push(object);
                }
                TraceOutcome::Snaking(pixel) => {
                    trace!("blocking {pixel:?} for start {start:?}");
                    blocked.toggle(pixel)?;
                    coverage.toggle(pixel)?;
                }
                TraceOutcome::Unrecoverable => {
                    trace!("no object from {start:?}, marking single pixel");
                    isolated.toggle(start)?;
                    coverage.toggle(start)?;
                }
            }
        }

        Ok(Some(TracedFrame {
            objects,
            isolated: isolated.iter_ones().collect(),
            histogram,
            attempts,
        }))
    }

    /// Encode one frame. A frame that cannot be traced within the attempt
    /// ceiling yields the fallback sentinel instead of an error.
    pub fn encode(&self, bitmap: &Bitmap) -> Result<EncodedFrame> {
        let Some(traced) = self.trace(bitmap)? else {
            return Ok(EncodedFrame::sentinel(self.config.sentinel_len));
        };

        let table = PrefixTable::build(&traced.histogram);
        let mut writer = BitWriter::new(Vec::new());
        for object in &traced.objects {
            write_object(&mut writer, &table, object)?;
        }
        write_isolated_pixels(&mut writer, &traced.isolated)?;
        let data = writer.finish()?;

        debug!(
            "frame encoded: {} objects, {} isolated pixels, {} attempts, {} bytes",
            traced.objects.len(),
            traced.isolated.len(),
            traced.attempts,
            data.len()
        );
        trace!("frame data {}", hex::encode(&data));
        Ok(EncodedFrame {
            data,
            fallback: false,
        })
    }
}

/// Encode independent frames on the rayon pool, preserving order.
pub fn encode_frames(config: &EncoderConfig, frames: &[Bitmap]) -> Result<Vec<EncodedFrame>> {
    let encoder = FrameEncoder::new(config.clone())?;
    frames
        .par_iter()
        .enumerate()
        .map(|(index, frame)| {
            let encoded = encoder.encode(frame)?;
            if encoded.is_fallback() {
                warn!("frame {index} fell back to {} placeholder bytes", encoded.len());
            }
            Ok(encoded)
        })
        .collect()
}
