use crate::bits::BitWriter;
use crate::turtle::{Command, TurtleObject};
use crate::Result;
use std::{fmt, io};

/// Per-frame command counts feeding the prefix coder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistogram {
    counts: [u32; 9],
}

impl CommandHistogram {
    pub fn add(&mut self, object: &TurtleObject) {
        for (count, occurrences) in self.counts.iter_mut().zip(object.command_occurrences()) {
            *count += occurrences;
        }
    }

    pub fn count(&self, command: Command) -> u32 {
        self.counts[command.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Copy, Clone)]
enum NodeKind {
    Leaf(Command),
    Inner { left: usize, right: usize },
}

#[derive(Debug, Copy, Clone)]
struct Node {
    weight: u32,
    kind: NodeKind,
}

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Code {
    pub bits: u32,
    pub len: u8,
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.len as usize)
    }
}

/// Huffman code over the nine turtle commands.
///
/// Every command becomes a leaf, in enumeration order, even with a zero
/// count. Each round stable-sorts the pending nodes by weight, joins the two
/// lightest (first one on the left) and appends the parent, so equal weights
/// always resolve the same way. A left edge is a `1` bit, a right edge `0`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrefixTable {
    codes: [Code; 9],
}

impl PrefixTable {
    pub fn build(histogram: &CommandHistogram) -> Self {
        let mut nodes: Vec<Node> = Command::ALL
            .iter()
            .map(|&command| Node {
                weight: histogram.count(command),
                kind: NodeKind::Leaf(command),
            })
            .collect();
        let mut pending: Vec<usize> = (0..nodes.len()).collect();

        while pending.len() > 1 {
            pending.sort_by_key(|&i| nodes[i].weight);
            let left = pending.remove(0);
            let right = pending.remove(0);
            nodes.push(Node {
                weight: nodes[left].weight + nodes[right].weight,
                kind: NodeKind::Inner { left, right },
            });
            pending.push(nodes.len() - 1);
        }

        let mut codes = [Code::default(); 9];
        let mut stack = vec![(pending[0], Code::default())];
        while let Some((index, code)) = stack.pop() {
            match nodes[index].kind {
                NodeKind::Leaf(command) => codes[command.index()] = code,
                NodeKind::Inner { left, right } => {
                    let (bits, len) = (code.bits << 1, code.len + 1);
                    stack.push((left, Code { bits: bits | 1, len }));
                    stack.push((right, Code { bits, len }));
                }
            }
        }

        let table = PrefixTable { codes };
        debug!("prefix table for {} commands: {table:?}", histogram.total());
        table
    }

    pub fn code(&self, command: Command) -> Code {
        self.codes[command.index()]
    }

    pub fn write_command<W: io::Write>(
        &self,
        writer: &mut BitWriter<W>,
        command: Command,
    ) -> Result<()> {
        let code = self.code(command);
        writer.write_bits(code.bits, code.len)
    }
}

impl fmt::Debug for PrefixTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for command in Command::ALL {
            map.entry(&command, &self.code(command));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandHistogram, PrefixTable};
    use crate::bits::BitWriter;
    use crate::mask::Point;
    use crate::turtle::{consolidate, Command, TurtleObject};

    fn histogram(commands: &[Command]) -> CommandHistogram {
        let mut histogram = CommandHistogram::default();
        histogram.add(&TurtleObject::new(Point::new(0, 0), consolidate(commands)));
        histogram
    }

    fn assert_prefix_free(table: &PrefixTable) {
        for a in Command::ALL {
            for b in Command::ALL {
                if a == b {
                    continue;
                }
                let (ca, cb) = (table.code(a), table.code(b));
                assert!(ca.len > 0);
                if ca.len <= cb.len {
                    assert_ne!(
                        cb.bits >> (cb.len - ca.len),
                        ca.bits,
                        "{a:?} is a prefix of {b:?}"
                    );
                }
            }
        }
    }

    fn kraft_sum(table: &PrefixTable) -> f64 {
        Command::ALL
            .iter()
            .map(|&c| 0.5f64.powi(table.code(c).len as i32))
            .sum()
    }

    #[test]
    fn test_skewed_table() {
        crate::setup_logger();
        use Command::*;
        let table = PrefixTable::build(&histogram(&[Left45, Right90, Right90, Right90]));
        assert_eq!(format!("{:?}", table.code(Right90)), "0");
        assert_eq!(format!("{:?}", table.code(Left45)), "10");
        assert_prefix_free(&table);
        assert!((kraft_sum(&table) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_histogram_is_complete() {
        let table = PrefixTable::build(&CommandHistogram::default());
        assert_prefix_free(&table);
        assert!((kraft_sum(&table) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequent_commands_get_short_codes() {
        use Command::*;
        let mut commands = vec![];
        for _ in 0..20 {
            commands.extend([Right45, Forward1, Left45]);
        }
        commands.extend([Right90, Left90, Right135]);
        let histogram = histogram(&commands);
        assert_eq!(histogram.count(Right45), 20);
        let table = PrefixTable::build(&histogram);
        assert_prefix_free(&table);
        assert!(kraft_sum(&table) <= 1.0 + 1e-12);
        assert!(table.code(Right45).len <= 2);
        assert!(table.code(Right45).len < table.code(Right135).len);
    }

    #[test]
    fn test_write_command() {
        use Command::*;
        let table = PrefixTable::build(&histogram(&[Left45, Right90, Right90, Right90]));
        let mut out = vec![];
        let mut writer = BitWriter::new(&mut out);
        table.write_command(&mut writer, Left45).unwrap();
        table.write_command(&mut writer, Right90).unwrap();
        table.write_command(&mut writer, Right90).unwrap();
        table.write_command(&mut writer, Right90).unwrap();
        writer.finish().unwrap();
        assert_eq!(out, vec![0b1000_0000]);
    }
}
