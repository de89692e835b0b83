use crate::bits::{zigzag, BitWriter};
use crate::mask::Point;
use crate::{Error, Result};
use std::io;

/// Absolute 8-bit x and y, used for object starts and the first chain pixel.
pub(crate) fn write_coordinate<W: io::Write>(writer: &mut BitWriter<W>, p: Point) -> Result<()> {
    if !(0..=255).contains(&p.x) || !(0..=255).contains(&p.y) {
        return Err(Error::CoordinateOutOfRange { x: p.x, y: p.y });
    }
    writer.write_bits(p.x as u32, 8)?;
    writer.write_bits(p.y as u32, 8)
}

/// Greedy nearest-neighbor chain over the isolated pixels.
///
/// The first pixel is written raw; every following one is the closest
/// remaining pixel by Manhattan distance (earliest in `pixels` on ties),
/// written as zig-zag Exponential-Golomb deltas. This is not a shortest tour.
pub fn write_isolated_pixels<W: io::Write>(
    writer: &mut BitWriter<W>,
    pixels: &[Point],
) -> Result<()> {
    let Some((&first, rest)) = pixels.split_first() else {
        return Ok(());
    };
    write_coordinate(writer, first)?;

    let mut remaining = rest.to_vec();
    let mut current = first;
    while let Some(index) = remaining
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| current.manhattan(**p))
        .map(|(index, _)| index)
    {
        let next = remaining.remove(index);
        let (dx, dy) = (next.x - current.x, next.y - current.y);
        trace!("chain {current:?} -> {next:?} ({dx}, {dy})");
        writer.write_exponential_golomb(zigzag(dx))?;
        writer.write_exponential_golomb(zigzag(dy))?;
        current = next;
    }
    Ok(())
}
