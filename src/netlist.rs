//! Nets, problem description and the problem-file reader.

use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ParseError, ProblemError, Result};
use crate::grid::RoutingGrid;
use crate::types::{NetId, Point};

/// A source pin and the sinks to connect to it, in routing priority order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    pub id: NetId,
    pub source: Point,
    pub sinks: Vec<Point>,
}

impl Net {
    /// First pin is the source. `None` if `pins` is empty.
    pub fn from_pins(id: NetId, pins: &[Point]) -> Option<Self> {
        let (&source, sinks) = pins.split_first()?;
        Some(Self {
            id,
            source,
            sinks: sinks.to_vec(),
        })
    }

    /// Source followed by sinks
    pub fn pins(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.source).chain(self.sinks.iter().copied())
    }
}

/// Grid dimensions, obstructions and nets, validated against each other
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub width: i32,
    pub height: i32,
    pub obstructions: Vec<Point>,
    pub nets: Vec<Net>,
}

impl Problem {
    /// Validate and assemble a problem. Net ids follow the order of `nets`.
    pub fn new(
        width: i32,
        height: i32,
        obstructions: Vec<Point>,
        nets: Vec<Vec<Point>>,
    ) -> Result<Self, ProblemError> {
        if width <= 0 || height <= 0 {
            return Err(ProblemError::BadDimensions { width, height });
        }
        // Cell indices and search costs stay in range as long as the cell count fits in an i32
        if width.checked_mul(height).is_none() {
            return Err(ProblemError::GridTooLarge { width, height });
        }
        let in_bounds = |p: Point| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;

        if let Some(&p) = obstructions.iter().find(|&&p| !in_bounds(p)) {
            return Err(ProblemError::ObstructionOutOfBounds(p));
        }
        let blocked: FxHashSet<Point> = obstructions.iter().copied().collect();

        let mut pin_owner: FxHashMap<Point, NetId> = FxHashMap::default();
        let mut built = Vec::with_capacity(nets.len());
        for (id, pins) in nets.iter().enumerate() {
            let id = id as NetId;
            let net = Net::from_pins(id, pins).ok_or(ProblemError::EmptyNet(id))?;
            for pin in net.pins() {
                if !in_bounds(pin) {
                    return Err(ProblemError::PinOutOfBounds { net: id, pin });
                }
                if blocked.contains(&pin) {
                    return Err(ProblemError::PinOnObstruction { net: id, pin });
                }
                let first = *pin_owner.entry(pin).or_insert(id);
                if first != id {
                    return Err(ProblemError::SharedPin {
                        pin,
                        first,
                        second: id,
                    });
                }
            }
            built.push(net);
        }

        Ok(Self {
            width,
            height,
            obstructions,
            nets: built,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = Lines::new(text);

        let (line, dims) = lines.next_values("grid dimensions")?;
        expect_len(line, &dims, 2)?;
        let (width, height) = (dims[0], dims[1]);

        let num_obstructions = lines.next_count("obstruction count")?;
        let mut obstructions = Vec::with_capacity(num_obstructions);
        for _ in 0..num_obstructions {
            let (line, xy) = lines.next_values("obstruction coordinate")?;
            expect_len(line, &xy, 2)?;
            obstructions.push(Point::new(xy[0], xy[1]));
        }

        let num_nets = lines.next_count("net count")?;
        let mut nets = Vec::with_capacity(num_nets);
        for _ in 0..num_nets {
            let (line, values) = lines.next_values("net pin list")?;
            // next_values skips blank lines, so there is always a first value
            let num_pins = values[0];
            if num_pins < 0 {
                return Err(ParseError::NegativeCount {
                    line,
                    value: num_pins.into(),
                }
                .into());
            }
            expect_len(line, &values, 1 + 2 * num_pins as usize)?;
            let pins = values[1..]
                .chunks_exact(2)
                .map(|xy| Point::new(xy[0], xy[1]))
                .collect();
            nets.push(pins);
        }

        Ok(Self::new(width, height, obstructions, nets)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Grid with obstructions placed and every pin of every net claimed by its net
    pub fn build_grid(&self) -> RoutingGrid {
        let mut grid = RoutingGrid::with_obstructions(self.width, self.height, &self.obstructions);
        for net in &self.nets {
            grid.claim_pins(net.id, net.pins());
        }
        grid
    }
}

impl FromStr for Problem {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn expect_len(line: usize, values: &[i32], expected: usize) -> Result<(), ParseError> {
    if values.len() != expected {
        return Err(ParseError::WrongTokenCount {
            line,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

/// Non-blank lines of integers, with 1-based line numbers
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_values(&mut self, expected: &'static str) -> Result<(usize, Vec<i32>), ParseError> {
        for (idx, raw) in self.inner.by_ref() {
            let line = idx + 1;
            self.last_line = line;
            if raw.trim().is_empty() {
                continue;
            }
            let values = raw
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<i32>().map_err(|_| ParseError::InvalidInteger {
                        line,
                        token: tok.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok((line, values));
        }
        Err(ParseError::UnexpectedEof {
            line: self.last_line + 1,
            expected,
        })
    }

    fn next_count(&mut self, expected: &'static str) -> Result<usize, ParseError> {
        let (line, values) = self.next_values(expected)?;
        expect_len(line, &values, 1)?;
        usize::try_from(values[0]).map_err(|_| ParseError::NegativeCount {
            line,
            value: values[0].into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::CellState;

    const SAMPLE: &str = "\
5 4
2
2 1
2 2

2
2 0 0 4 3
3 0 3 4 0 1 1
";

    #[test]
    fn parses_sample_problem() {
        let problem: Problem = SAMPLE.parse().unwrap();
        assert_eq!((problem.width, problem.height), (5, 4));
        assert_eq!(problem.obstructions, vec![Point::new(2, 1), Point::new(2, 2)]);
        assert_eq!(problem.nets.len(), 2);
        assert_eq!(problem.nets[0].source, Point::new(0, 0));
        assert_eq!(problem.nets[0].sinks, vec![Point::new(4, 3)]);
        assert_eq!(problem.nets[1].id, 1);
        assert_eq!(
            problem.nets[1].pins().collect::<Vec<_>>(),
            vec![Point::new(0, 3), Point::new(4, 0), Point::new(1, 1)]
        );
    }

    #[test]
    fn reads_demo_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/two_nets.txt");
        let problem = Problem::from_file(path).unwrap();
        assert_eq!((problem.width, problem.height), (10, 6));
        assert_eq!(problem.obstructions.len(), 6);
        assert_eq!(problem.nets.len(), 3);
        assert_eq!(problem.nets[0].sinks, vec![Point::new(9, 0), Point::new(2, 5)]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Problem::from_file("/nonexistent/problem.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn build_grid_claims_all_pins() {
        let problem = Problem::parse(SAMPLE).unwrap();
        let grid = problem.build_grid();
        assert_eq!(grid.get(Point::new(2, 1)), CellState::Obstruction);
        assert_eq!(grid.get(Point::new(4, 3)), CellState::Owned(0));
        assert_eq!(grid.get(Point::new(1, 1)), CellState::Owned(1));
        assert_eq!(grid.get(Point::new(3, 3)), CellState::Free);
    }

    #[test]
    fn reports_line_of_bad_token() {
        let err = Problem::parse("5 5\n1\n2 x\n0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidInteger { line: 3, ref token }) if token == "x"
        ));
    }

    #[test]
    fn reports_truncated_input() {
        let err = Problem::parse("5 5\n2\n1 1\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::UnexpectedEof { expected: "obstruction coordinate", .. })
        ));
    }

    #[test]
    fn pin_count_must_match_coordinates() {
        let err = Problem::parse("5 5\n0\n1\n3 0 0 1 1\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::WrongTokenCount {
                line: 4,
                expected: 7,
                found: 5
            })
        ));
    }

    #[test]
    fn rejects_pin_on_obstruction() {
        let err = Problem::new(
            3,
            3,
            vec![Point::new(1, 1)],
            vec![vec![Point::new(0, 0), Point::new(1, 1)]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProblemError::PinOnObstruction {
                net: 0,
                pin: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn rejects_out_of_bounds_input() {
        assert_eq!(
            Problem::new(3, 3, vec![Point::new(3, 0)], vec![]).unwrap_err(),
            ProblemError::ObstructionOutOfBounds(Point::new(3, 0))
        );
        assert_eq!(
            Problem::new(3, 3, vec![], vec![vec![Point::new(0, 0), Point::new(0, -1)]])
                .unwrap_err(),
            ProblemError::PinOutOfBounds {
                net: 0,
                pin: Point::new(0, -1)
            }
        );
        assert!(matches!(
            Problem::new(0, 3, vec![], vec![]),
            Err(ProblemError::BadDimensions { .. })
        ));
    }

    #[test]
    fn rejects_pins_shared_between_nets() {
        let err = Problem::new(
            4,
            4,
            vec![],
            vec![
                vec![Point::new(0, 0), Point::new(3, 3)],
                vec![Point::new(3, 3), Point::new(0, 3)],
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProblemError::SharedPin {
                pin: Point::new(3, 3),
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn rejects_grid_too_large_to_index() {
        let err = Problem::parse("70000 70000\n0\n1\n2 0 0 1 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Problem(ProblemError::GridTooLarge {
                width: 70000,
                height: 70000
            })
        ));
        assert!(Problem::new(46340, 46340, vec![], vec![]).is_ok());
    }

    #[test]
    fn rejects_negative_obstruction_count() {
        let err = Problem::parse("5 5\n-1\n0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::NegativeCount { line: 2, value: -1 })
        ));
    }

    #[test]
    fn rejects_negative_pin_count() {
        let err = Problem::parse("5 5\n0\n1\n-2 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::NegativeCount { line: 4, value: -2 })
        ));
    }

    #[test]
    fn rejects_empty_net() {
        let err = Problem::parse("3 3\n0\n1\n0\n").unwrap_err();
        assert!(matches!(err, Error::Problem(ProblemError::EmptyNet(0))));
    }
}
