use crate::mask::{turn, Point};
use crate::{Error, Result, MAX_FRAME_SIDE};
use std::fmt;

/// One symbol of the turtle alphabet. The discriminant is the symbol's
/// position in the prefix coder's leaf order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    Left135,
    Left90,
    Left45,
    Forward1,
    ForwardN,
    ForwardMany,
    Right45,
    Right90,
    Right135,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Left135,
        Command::Left90,
        Command::Left45,
        Command::Forward1,
        Command::ForwardN,
        Command::ForwardMany,
        Command::Right45,
        Command::Right90,
        Command::Right135,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Clockwise turn in eighth turns applied before moving.
    pub fn turn(self) -> u8 {
        match self {
            Command::Left135 => 5,
            Command::Left90 => 6,
            Command::Left45 => 7,
            Command::Forward1 | Command::ForwardN | Command::ForwardMany => 0,
            Command::Right45 => 1,
            Command::Right90 => 2,
            Command::Right135 => 3,
        }
    }

    /// Command for a heading change; reversals have none.
    pub fn from_headings(current: u8, next: u8) -> Option<Command> {
        match turn(next, -(current as i32)) {
            5 => Some(Command::Left135),
            6 => Some(Command::Left90),
            7 => Some(Command::Left45),
            0 => Some(Command::Forward1),
            1 => Some(Command::Right45),
            2 => Some(Command::Right90),
            3 => Some(Command::Right135),
            _ => None,
        }
    }

    pub fn is_forward(self) -> bool {
        matches!(
            self,
            Command::Forward1 | Command::ForwardN | Command::ForwardMany
        )
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct TurtleStep {
    pub command: Command,
    /// Pixels advanced; only meaningful for `ForwardN`.
    pub run: u32,
}

impl TurtleStep {
    pub fn new(command: Command, run: u32) -> Self {
        TurtleStep { command, run }
    }
}

impl fmt::Debug for TurtleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            Command::ForwardN => write!(f, "ForwardN({})", self.run),
            Command::ForwardMany => write!(f, "ForwardMany({})", self.run),
            command => write!(f, "{command:?}"),
        }
    }
}

/// Collapse runs of `Forward1` into `ForwardN` and re-tag a trailing
/// `ForwardN` as the terminal `ForwardMany(1)`.
pub fn consolidate(commands: &[Command]) -> Vec<TurtleStep> {
    fn flush(steps: &mut Vec<TurtleStep>, run: &mut u32) {
        match *run {
            0 => {}
            1 => steps.push(TurtleStep::new(Command::Forward1, 1)),
            n => steps.push(TurtleStep::new(Command::ForwardN, n)),
        }
        *run = 0;
    }

    let mut steps = Vec::with_capacity(commands.len());
    let mut run = 0;
    for &command in commands {
        if command == Command::Forward1 {
            run += 1;
        } else {
            flush(&mut steps, &mut run);
            steps.push(TurtleStep::new(command, 1));
        }
    }
    flush(&mut steps, &mut run);

    if let Some(last) = steps.last_mut() {
        if last.command == Command::ForwardN {
            *last = TurtleStep::new(Command::ForwardMany, 1);
        }
    }
    steps
}

/// A closed contour: start pixel plus turtle steps.
#[derive(Clone, PartialEq, Eq)]
pub struct TurtleObject {
    pub start: Point,
    pub steps: Vec<TurtleStep>,
}

impl TurtleObject {
    pub fn new(start: Point, steps: Vec<TurtleStep>) -> Self {
        TurtleObject { start, steps }
    }

    pub fn command_occurrences(&self) -> [u32; 9] {
        let mut occurrences = [0; 9];
        for step in &self.steps {
            occurrences[step.command.index()] += 1;
        }
        occurrences
    }

    /// Replay the steps from `start` facing `heading`, returning the polygon
    /// vertices. The first and last vertex are both the start pixel.
    ///
    /// `ForwardMany` carries no usable length; it walks straight on until
    /// the start pixel is reached.
    pub fn vertices(&self, mut heading: u8) -> Result<Vec<Point>> {
        let mut position = self.start;
        let mut vertices = Vec::with_capacity(self.steps.len() + 1);
        vertices.push(position);
        for step in &self.steps {
            heading = turn(heading, step.command.turn() as i32);
            match step.command {
                Command::ForwardMany => {
                    let mut walked = 0;
                    loop {
                        position = position.step(heading, 1);
                        walked += 1;
                        if position == self.start {
                            break;
                        }
                        if walked > MAX_FRAME_SIDE {
                            return Err(Error::OpenContour {
                                x: self.start.x,
                                y: self.start.y,
                            });
                        }
                    }
                }
                Command::ForwardN => position = position.step(heading, step.run as i32),
                _ => position = position.step(heading, 1),
            }
            vertices.push(position);
        }
        if position != self.start {
            return Err(Error::OpenContour {
                x: self.start.x,
                y: self.start.y,
            });
        }
        Ok(vertices)
    }
}

impl fmt::Debug for TurtleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurtleObject")
            .field("start", &(self.start.x, self.start.y))
            .field("steps", &self.steps)
            .finish()
    }
}
