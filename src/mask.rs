use crate::{Error, Result};
use image::GrayImage;
use std::fmt;
use std::ops::{BitOrAssign, BitXor, BitXorAssign};

/// x offset per heading, clockwise from +x with y growing downward.
const DX: [i32; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    #[inline(always)]
    pub fn step(self, heading: u8, dist: i32) -> Point {
        let heading = (heading & 7) as usize;
        Point {
            x: self.x + DX[heading] * dist,
            y: self.y + DY[heading] * dist,
        }
    }

    #[inline(always)]
    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Rotate `heading` by `delta` eighth turns.
#[inline(always)]
pub fn turn(heading: u8, delta: i32) -> u8 {
    (heading as i32 + delta).rem_euclid(8) as u8
}

/// A W×H boolean grid. Bitmaps, coverage and the tracer's scratch masks are
/// all masks; reads outside the grid are `false`.
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

pub type Bitmap = Mask;

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Mask {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.bits[y * width + x] = f(x, y);
            }
        }
        mask
    }

    /// Unpack a frame where pixel `y * width + x` lives in bit `i % 8`
    /// (LSB first) of byte `i / 8`.
    pub fn from_packed(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        let expected = (width * height + 7) / 8;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let bits = (0..width * height)
            .map(|i| (data[i / 8] >> (i % 8)) & 1 == 1)
            .collect();
        Ok(Mask {
            width,
            height,
            bits,
        })
    }

    /// Threshold an already sized luma frame at mid grey.
    pub fn from_luma(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Mask::from_fn(width as usize, height as usize, |x, y| {
            image.get_pixel(x as u32, y as u32).0[0] >= 128
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    #[inline(always)]
    pub fn contains(&self, p: Point) -> bool {
        self.index(p).is_some()
    }

    #[inline(always)]
    pub fn get(&self, p: Point) -> bool {
        self.index(p).map_or(false, |i| self.bits[i])
    }

    pub fn set(&mut self, p: Point, value: bool) -> Result<()> {
        let i = self
            .index(p)
            .ok_or(Error::CoordinateOutOfRange { x: p.x, y: p.y })?;
        self.bits[i] = value;
        Ok(())
    }

    /// Set a pixel known to be inside the grid; positions outside are ignored.
    #[inline(always)]
    pub(crate) fn mark(&mut self, p: Point) {
        if let Some(i) = self.index(p) {
            self.bits[i] = true;
        }
    }

    pub fn toggle(&mut self, p: Point) -> Result<()> {
        let i = self
            .index(p)
            .ok_or(Error::CoordinateOutOfRange { x: p.x, y: p.y })?;
        self.bits[i] ^= true;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = false);
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Set pixels in row-major order (top row first, left to right).
    pub fn iter_ones(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width;
        self.bits
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(move |(i, _)| Point::new((i % width) as i32, (i / width) as i32))
    }

    /// First pixel, in row-major order, where `self` and `other` disagree.
    pub fn first_difference(&self, other: &Mask) -> Option<Point> {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.bits
            .iter()
            .zip(other.bits.iter())
            .position(|(a, b)| a != b)
            .map(|i| Point::new((i % self.width) as i32, (i / self.width) as i32))
    }
}

impl BitXorAssign<&Mask> for Mask {
    fn bitxor_assign(&mut self, rhs: &Mask) {
        debug_assert_eq!(self.bits.len(), rhs.bits.len());
        for (a, b) in self.bits.iter_mut().zip(rhs.bits.iter()) {
            *a ^= *b;
        }
    }
}

impl BitOrAssign<&Mask> for Mask {
    fn bitor_assign(&mut self, rhs: &Mask) {
        debug_assert_eq!(self.bits.len(), rhs.bits.len());
        for (a, b) in self.bits.iter_mut().zip(rhs.bits.iter()) {
            *a |= *b;
        }
    }
}

impl BitXor<&Mask> for &Mask {
    type Output = Mask;

    fn bitxor(self, rhs: &Mask) -> Mask {
        let mut out = self.clone();
        out ^= rhs;
        out
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mask {}x{}", self.width, self.height)?;
        for row in self.bits.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|&b| if b { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
