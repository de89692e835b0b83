use crate::{Error, Result};
use std::fmt::Debug;
use std::{fmt, io};

/// MSB-first bit packer. Completed bytes go straight to the inner writer,
/// the trailing partial byte is held until [`BitWriter::finish`].
pub struct BitWriter<W> {
    buf: u8,
    bit_len: u8,
    bytes_written: usize,
    writer: W,
}

impl<W: io::Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        BitWriter {
            buf: 0,
            bit_len: 0,
            bytes_written: 0,
            writer,
        }
    }

    #[inline(always)]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.buf = (self.buf << 1) | bit as u8;
        self.bit_len += 1;
        if self.bit_len == 8 {
            trace!("flush byte {:08b}", self.buf);
            self.writer.write_all(&[self.buf])?;
            self.bytes_written += 1;
            self.buf = 0;
            self.bit_len = 0;
        }
        Ok(())
    }

    /// Append the `count` lowest bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= 32);
        trace!("write {count} bits of {value:b}");
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    pub fn write_to_byte_boundary(&mut self) -> Result<()> {
        if self.bit_len == 0 {
            return Ok(());
        }
        self.write_bits(0, 8 - self.bit_len)
    }

    /// Rice code with parameter `k`: the quotient in unary zeros, then a one
    /// bit and the `k` remainder bits. Returns the quotient.
    pub fn write_rice(&mut self, value: u32, k: u8) -> Result<u32> {
        debug_assert!(k < 32);
        let quotient = value >> k;
        let pattern = (1u32 << k) | (value & ((1u32 << k) - 1));
        for _ in 0..quotient {
            self.write_bit(false)?;
        }
        self.write_bits(pattern, k + 1)?;
        Ok(quotient)
    }

    /// Order-0 Exponential-Golomb code of a strictly positive value.
    pub fn write_exponential_golomb(&mut self, value: u32) -> Result<()> {
        if value == 0 {
            return Err(Error::ZeroGolomb);
        }
        let leading_bits = (32 - value.leading_zeros()) as u8;
        self.write_bits(0, leading_bits - 1)?;
        self.write_bits(value, leading_bits)
    }

    /// Bits written so far, including the pending partial byte.
    pub fn bit_position(&self) -> usize {
        self.bytes_written * 8 + self.bit_len as usize
    }

    /// Pad the last byte with zeros, flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.write_to_byte_boundary()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W> Debug for BitWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitWriter")
            .field(
                "buf",
                &format!("{:0width$b}", self.buf, width = self.bit_len as usize),
            )
            .field("bit_len", &self.bit_len)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}

/// Map a signed delta onto the positive integers: `2|d|`, plus one when
/// `d >= 0`. Zero maps to 1 so the result is always Exponential-Golomb safe.
#[inline(always)]
pub fn zigzag(value: i32) -> u32 {
    2 * value.unsigned_abs() + (value >= 0) as u32
}

#[inline(always)]
pub fn unzigzag(value: u32) -> i32 {
    let magnitude = (value / 2) as i32;
    if value & 1 == 1 {
        magnitude
    } else {
        -magnitude
    }
}

/// Reads back what [`BitWriter`] produced.
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitReader { data, position: 0 }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.position / 8)
            .ok_or(Error::UnexpectedEof)?;
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }

    pub fn read_rice(&mut self, k: u8) -> Result<u32> {
        let mut quotient = 0u32;
        while !self.read_bit()? {
            quotient += 1;
        }
        let remainder = self.read_bits(k)?;
        Ok((quotient << k) | remainder)
    }

    pub fn read_exponential_golomb(&mut self) -> Result<u32> {
        let mut zeros = 0u8;
        while !self.read_bit()? {
            zeros += 1;
            if zeros >= 32 {
                return Err(Error::UnexpectedEof);
            }
        }
        let rest = self.read_bits(zeros)?;
        Ok((1u32 << zeros) | rest)
    }

    pub fn skip_to_byte_boundary(&mut self) {
        self.position = (self.position + 7) / 8 * 8;
    }

    pub fn bit_position(&self) -> usize {
        self.position
    }
}
