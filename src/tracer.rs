//! Backtracking contour search.
//!
//! The turtle starts on a foreground pixel facing the configured heading and
//! always prefers the sharpest left turn it is allowed to take. Walking a
//! region clockwise this way keeps it on the outer boundary. A pixel it
//! cannot leave is marked as a deadend and the walk steps back; a walk that
//! would have to cross its own trail to continue is reported as snaking.

use crate::config::EncoderConfig;
use crate::mask::{turn, Mask, Point};
use crate::turtle::{consolidate, Command, TurtleObject};

/// Result of scanning the neighborhood of the current pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Probe {
    Advance { to: Point, heading: u8 },
    Deadend,
    Snaking(Point),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutcome {
    Closed(TurtleObject),
    /// The only way on crosses the trail; the pixel is the trail pixel that
    /// blocked the preferred turn.
    Snaking(Point),
    /// Backtracked past the start pixel.
    Unrecoverable,
}

#[derive(Debug, Copy, Clone)]
struct Checkpoint {
    position: Point,
    heading: u8,
}

pub struct Tracer<'a> {
    source: &'a Mask,
    start: Point,
    max_turn: i32,
    initial_heading: u8,
    covered: Mask,
    deadends: Mask,
    trail: Vec<Checkpoint>,
    commands: Vec<Command>,
}

impl<'a> Tracer<'a> {
    /// `source` holds the pixels still to be accounted for.
    pub fn new(config: &EncoderConfig, source: &'a Mask, start: Point) -> Self {
        Tracer {
            source,
            start,
            max_turn: config.max_turn as i32,
            initial_heading: config.initial_heading,
            covered: Mask::new(source.width(), source.height()),
            deadends: Mask::new(source.width(), source.height()),
            trail: vec![],
            commands: vec![],
        }
    }

    pub fn trace(mut self) -> TraceOutcome {
        if !self.source.get(self.start) {
            return TraceOutcome::Unrecoverable;
        }
        let mut position = self.start;
        let mut heading = self.initial_heading;
        self.covered.mark(position);

        loop {
            match self.leftmost_uncovered_neighbor(position, heading) {
                Probe::Advance { to, heading: next } => {
                    let Some(command) = Command::from_headings(heading, next) else {
                        unreachable!("turn window excludes reversals");
                    };
                    trace!("{position:?} -> {to:?} {command:?}");
                    self.trail.push(Checkpoint { position, heading });
                    self.commands.push(command);
                    position = to;
                    heading = next;
                    self.covered.mark(position);
                    if position == self.start {
                        break;
                    }
                }
                Probe::Deadend => {
                    let Some(checkpoint) = self.trail.pop() else {
                        trace!("deadend at start {:?}", self.start);
                        return TraceOutcome::Unrecoverable;
                    };
                    self.commands.pop();
                    trace!("deadend at {position:?}, back to {:?}", checkpoint.position);
                    self.deadends.mark(position);
                    position = checkpoint.position;
                    heading = checkpoint.heading;
                }
                Probe::Snaking(blocking) => {
                    trace!("snaking into {blocking:?} from {position:?}");
                    return TraceOutcome::Snaking(blocking);
                }
            }
        }

        let steps = consolidate(&self.commands);
        TraceOutcome::Closed(TurtleObject::new(self.start, steps))
    }

    /// Scan from the sharpest left to the sharpest right turn.
    fn leftmost_uncovered_neighbor(&self, position: Point, heading: u8) -> Probe {
        let mut blocking = None;
        for delta in -self.max_turn..=self.max_turn {
            let next_heading = turn(heading, delta);
            let neighbor = position.step(next_heading, 1);
            if !self.source.get(neighbor) || self.deadends.get(neighbor) {
                continue;
            }
            if neighbor == self.start {
                return Probe::Advance {
                    to: neighbor,
                    heading: next_heading,
                };
            }
            if self.covered.get(neighbor) {
                blocking = Some(neighbor);
                continue;
            }
            if let Some(blocking) = blocking {
                return Probe::Snaking(blocking);
            }
            return Probe::Advance {
                to: neighbor,
                heading: next_heading,
            };
        }
        Probe::Deadend
    }
}

#[cfg(test)]
mod tests {
    use super::{Probe, TraceOutcome, Tracer};
    use crate::config::EncoderConfig;
    use crate::mask::{Mask, Point};
    use crate::turtle::{Command::*, TurtleStep};

    fn rect(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Mask {
        Mask::from_fn(width, height, |x, y| (x0..=x1).contains(&x) && (y0..=y1).contains(&y))
    }

    fn trace(bitmap: &Mask, start: Point) -> TraceOutcome {
        let config = EncoderConfig::new(bitmap.width(), bitmap.height());
        Tracer::new(&config, bitmap, start).trace()
    }

    fn closed(outcome: TraceOutcome) -> Vec<TurtleStep> {
        match outcome {
            TraceOutcome::Closed(object) => {
                object.vertices(1).unwrap();
                object.steps
            }
            other => panic!("expected a closed contour, got {other:?}"),
        }
    }

    #[test]
    fn test_single_pixel_is_unrecoverable() {
        crate::setup_logger();
        let bitmap = rect(8, 8, 3, 3, 3, 3);
        assert_eq!(trace(&bitmap, Point::new(3, 3)), TraceOutcome::Unrecoverable);
    }

    #[test]
    fn test_short_line_backtracks_to_start() {
        let bitmap = rect(4, 4, 0, 0, 1, 0);
        assert_eq!(trace(&bitmap, Point::new(0, 0)), TraceOutcome::Unrecoverable);
    }

    #[test]
    fn test_square_2x2() {
        let bitmap = rect(4, 4, 0, 0, 1, 1);
        let steps = closed(trace(&bitmap, Point::new(0, 0)));
        assert_eq!(
            steps,
            vec![
                TurtleStep::new(Left45, 1),
                TurtleStep::new(Right90, 1),
                TurtleStep::new(Right90, 1),
                TurtleStep::new(Right90, 1),
            ]
        );
    }

    #[test]
    fn test_square_4x4_ends_with_forward_many() {
        let bitmap = rect(8, 8, 2, 2, 5, 5);
        let steps = closed(trace(&bitmap, Point::new(2, 2)));
        assert_eq!(
            steps,
            vec![
                TurtleStep::new(Left45, 1),
                TurtleStep::new(ForwardN, 2),
                TurtleStep::new(Right90, 1),
                TurtleStep::new(ForwardN, 2),
                TurtleStep::new(Right90, 1),
                TurtleStep::new(ForwardN, 2),
                TurtleStep::new(Right90, 1),
                TurtleStep::new(ForwardMany, 1),
            ]
        );
    }

    #[test]
    fn test_ring_follows_outer_edge() {
        let mut bitmap = rect(3, 3, 0, 0, 2, 2);
        bitmap.set(Point::new(1, 1), false).unwrap();
        let steps = closed(trace(&bitmap, Point::new(0, 0)));
        let commands: Vec<_> = steps.iter().map(|s| s.command).collect();
        assert_eq!(
            commands,
            vec![Left45, Forward1, Right90, Forward1, Right90, Forward1, Right90, Forward1]
        );
    }

    #[test]
    fn test_probe_outcomes() {
        let source = rect(5, 5, 0, 0, 4, 4);
        let config = EncoderConfig::new(5, 5);
        let mut tracer = Tracer::new(&config, &source, Point::new(0, 4));
        let here = Point::new(2, 2);

        assert_eq!(
            tracer.leftmost_uncovered_neighbor(here, 0),
            Probe::Advance {
                to: Point::new(1, 1),
                heading: 5
            }
        );

        tracer.covered.mark(Point::new(1, 1));
        assert_eq!(
            tracer.leftmost_uncovered_neighbor(here, 0),
            Probe::Snaking(Point::new(1, 1))
        );

        for p in [(2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3)] {
            tracer.covered.mark(Point::new(p.0, p.1));
        }
        assert_eq!(tracer.leftmost_uncovered_neighbor(here, 0), Probe::Deadend);

        tracer.deadends.mark(Point::new(1, 1));
        tracer.deadends.mark(Point::new(2, 1));
        tracer.covered = Mask::new(5, 5);
        assert_eq!(
            tracer.leftmost_uncovered_neighbor(here, 0),
            Probe::Advance {
                to: Point::new(3, 1),
                heading: 7
            }
        );
    }

    #[test]
    fn test_probe_accepts_covered_start() {
        let source = rect(5, 5, 0, 0, 4, 4);
        let config = EncoderConfig::new(5, 5);
        let mut tracer = Tracer::new(&config, &source, Point::new(3, 3));
        for p in [(3, 1), (3, 2), (3, 3)] {
            tracer.covered.mark(Point::new(p.0, p.1));
        }
        assert_eq!(
            tracer.leftmost_uncovered_neighbor(Point::new(2, 2), 2),
            Probe::Advance {
                to: Point::new(3, 3),
                heading: 1
            }
        );
    }
}
