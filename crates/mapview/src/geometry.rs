use std::fmt;
use std::ops::{Add, Sub};

use bitflags::bitflags;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn mult(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise division; a zero divisor component yields zero.
    pub fn div(self, other: Vec2) -> Vec2 {
        Vec2::new(
            checked_div_or_zero(self.x, other.x),
            checked_div_or_zero(self.y, other.y),
        )
    }
}

fn checked_div_or_zero(value: i32, divisor: i32) -> i32 {
    value.checked_div(divisor).unwrap_or(0)
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.left && pos.x < self.right && pos.y >= self.top && pos.y < self.bottom
    }

    pub fn intersection(&self, other: Rect) -> Rect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right).max(left);
        let bottom = self.bottom.min(other.bottom).max(top);
        Rect::new(left, top, right, bottom)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> {
        let Rect {
            left,
            top,
            right,
            bottom,
        } = *self;
        (top..bottom).flat_map(move |y| (left..right).map(move |x| Vec2::new(x, y)))
    }
}

/// Eight compass directions; y grows toward the viewer (south).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Dir {
    pub const CARDINAL: [Dir; 4] = [Dir::N, Dir::S, Dir::E, Dir::W];
    pub const DIAGONAL: [Dir; 4] = [Dir::NE, Dir::SE, Dir::NW, Dir::SW];
    pub const ALL: [Dir; 8] = [
        Dir::N,
        Dir::S,
        Dir::E,
        Dir::W,
        Dir::NE,
        Dir::NW,
        Dir::SE,
        Dir::SW,
    ];

    pub const fn offset(self) -> Vec2 {
        match self {
            Dir::N => Vec2::new(0, -1),
            Dir::S => Vec2::new(0, 1),
            Dir::E => Vec2::new(1, 0),
            Dir::W => Vec2::new(-1, 0),
            Dir::NE => Vec2::new(1, -1),
            Dir::NW => Vec2::new(-1, -1),
            Dir::SE => Vec2::new(1, 1),
            Dir::SW => Vec2::new(-1, 1),
        }
    }

    pub fn from_offset(offset: Vec2) -> Option<Dir> {
        Dir::ALL.into_iter().find(|dir| dir.offset() == offset)
    }

    pub const fn as_set(self) -> DirSet {
        match self {
            Dir::N => DirSet::N,
            Dir::S => DirSet::S,
            Dir::E => DirSet::E,
            Dir::W => DirSet::W,
            Dir::NE => DirSet::NE,
            Dir::NW => DirSet::NW,
            Dir::SE => DirSet::SE,
            Dir::SW => DirSet::SW,
        }
    }

    pub const fn flanking_cardinals(self) -> Option<(Dir, Dir)> {
        match self {
            Dir::NE => Some((Dir::N, Dir::E)),
            Dir::SE => Some((Dir::S, Dir::E)),
            Dir::NW => Some((Dir::N, Dir::W)),
            Dir::SW => Some((Dir::S, Dir::W)),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Dir::N => "N",
            Dir::S => "S",
            Dir::E => "E",
            Dir::W => "W",
            Dir::NE => "NE",
            Dir::NW => "NW",
            Dir::SE => "SE",
            Dir::SW => "SW",
        }
    }

    fn parse(token: &str) -> Option<Dir> {
        Dir::ALL.into_iter().find(|dir| dir.name() == token)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DirSet: u8 {
        const N = 1 << 0;
        const S = 1 << 1;
        const E = 1 << 2;
        const W = 1 << 3;
        const NE = 1 << 4;
        const NW = 1 << 5;
        const SE = 1 << 6;
        const SW = 1 << 7;
    }
}

impl DirSet {
    pub const CARDINALS: DirSet = DirSet::N
        .union(DirSet::S)
        .union(DirSet::E)
        .union(DirSet::W);
    pub const DIAGONALS: DirSet = DirSet::NE
        .union(DirSet::NW)
        .union(DirSet::SE)
        .union(DirSet::SW);

    pub fn has(&self, dir: Dir) -> bool {
        self.contains(dir.as_set())
    }

    pub fn insert_dir(&mut self, dir: Dir) {
        self.insert(dir.as_set());
    }

    pub fn dirs(&self) -> impl Iterator<Item = Dir> + '_ {
        Dir::ALL.into_iter().filter(|dir| self.has(*dir))
    }

    pub fn parse_list(raw: &str) -> Option<DirSet> {
        let mut set = DirSet::empty();
        for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            set.insert_dir(Dir::parse(token)?);
        }
        Some(set)
    }
}

impl FromIterator<Dir> for DirSet {
    fn from_iter<I: IntoIterator<Item = Dir>>(iter: I) -> Self {
        let mut set = DirSet::empty();
        for dir in iter {
            set.insert_dir(dir);
        }
        set
    }
}

impl fmt::Display for DirSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for dir in self.dirs() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(dir.name())?;
            first = false;
        }
        Ok(())
    }
}
