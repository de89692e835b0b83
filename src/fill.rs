use crate::mask::{Mask, Point};
use crate::turtle::TurtleObject;
use crate::Result;

/// Crossing-number test. Vertices and points on an edge, horizontal edges
/// included, count as inside.
pub fn is_point_in_path(p: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + polygon.len() - 1) % polygon.len()];
        if p == a {
            return true;
        }
        let cross = (p.x - a.x) as i64 * (b.y - a.y) as i64
            - (b.x - a.x) as i64 * (p.y - a.y) as i64;
        if cross == 0
            && (a.x.min(b.x)..=a.x.max(b.x)).contains(&p.x)
            && (a.y.min(b.y)..=a.y.max(b.y)).contains(&p.y)
        {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) && (cross < 0) != (b.y < a.y) {
            inside = !inside;
        }
    }
    inside
}

/// Coverage of a closed object: every frame pixel inside or on its polygon.
/// Only the polygon's bounding box is scanned.
pub fn fill_object(
    object: &TurtleObject,
    heading: u8,
    width: usize,
    height: usize,
) -> Result<Mask> {
    let polygon = object.vertices(heading)?;
    let mut filled = Mask::new(width, height);

    let min_x = polygon.iter().map(|p| p.x).min().unwrap_or(0).max(0);
    let max_x = polygon.iter().map(|p| p.x).max().unwrap_or(-1).min(width as i32 - 1);
    let min_y = polygon.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_y = polygon.iter().map(|p| p.y).max().unwrap_or(-1).min(height as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x, y);
            if is_point_in_path(p, &polygon) {
                filled.mark(p);
            }
        }
    }
    trace!(
        "filled {} pixels from {} vertices at {:?}",
        filled.count_ones(),
        polygon.len(),
        object.start
    );
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::{fill_object, is_point_in_path};
    use crate::mask::{Mask, Point};
    use crate::turtle::{consolidate, Command::*, TurtleObject};

    #[test]
    fn test_triangle_boundary_inclusive() {
        let triangle = [
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(0, 4),
            Point::new(0, 0),
        ];
        assert!(is_point_in_path(Point::new(1, 1), &triangle));
        assert!(is_point_in_path(Point::new(2, 2), &triangle));
        assert!(is_point_in_path(Point::new(2, 0), &triangle));
        assert!(is_point_in_path(Point::new(0, 3), &triangle));
        assert!(is_point_in_path(Point::new(4, 0), &triangle));
        assert!(!is_point_in_path(Point::new(3, 2), &triangle));
        assert!(!is_point_in_path(Point::new(5, 0), &triangle));
        assert!(!is_point_in_path(Point::new(-1, 1), &triangle));
    }

    #[test]
    fn test_fill_rectangle() {
        crate::setup_logger();
        let object = TurtleObject::new(
            Point::new(2, 2),
            consolidate(&[
                Left45, Forward1, Forward1, Right90, Forward1, Forward1, Right90, Forward1,
                Forward1, Right90, Forward1, Forward1,
            ]),
        );
        let filled = fill_object(&object, 1, 8, 8).unwrap();
        let expected = Mask::from_fn(8, 8, |x, y| (2..=5).contains(&x) && (2..=5).contains(&y));
        assert_eq!(filled, expected);
        assert_eq!(filled.count_ones(), 16);
    }

    #[test]
    fn test_fill_covers_hole() {
        let object = TurtleObject::new(
            Point::new(0, 0),
            consolidate(&[Left45, Forward1, Right90, Forward1, Right90, Forward1, Right90, Forward1]),
        );
        let filled = fill_object(&object, 1, 3, 3).unwrap();
        assert_eq!(filled.count_ones(), 9);
    }

    #[test]
    fn test_fill_diagonal_edges() {
        // diamond around (3, 3): (3,1) (5,3) (3,5) (1,3)
        let object = TurtleObject::new(
            Point::new(3, 1),
            consolidate(&[Forward1, Forward1, Right90, Forward1, Right90, Forward1, Right90, Forward1]),
        );
        let filled = fill_object(&object, 1, 7, 7).unwrap();
        let expected = Mask::from_fn(7, 7, |x, y| {
            (x as i32 - 3).abs() + (y as i32 - 3).abs() <= 2
        });
        assert_eq!(filled, expected);
    }
}
