//! Write-cursor locations on the grid.
//!
//! A [`Location`] is a column of cells starting at `(x, y)` with a scrolling
//! offset. A [`LocationManager`] holds an ordered ring of locations the
//! performer can jump between; exactly one of them is current.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HEIGHT: u32 = 127;

/// CC values above this scroll up, everything else scrolls down.
///
/// Matches the relative encoder output of the controller this was built
/// against; it is not the midpoint of the CC range.
pub const SCROLL_UP_ABOVE: u8 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    x: u32,
    y: u32,
    height: u32,
    index: u32,
}

impl Location {
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            height: DEFAULT_HEIGHT,
            index: 0,
        }
    }

    pub fn with_height(x: u32, y: u32, height: u32) -> Result<Self> {
        if height == 0 {
            return Err(Error::config(format!(
                "location {};{} must have a height of at least 1",
                x, y
            )));
        }
        let location = Self {
            x,
            y,
            height,
            index: 0,
        };
        location.validate()?;
        Ok(location)
    }

    /// Every row the cursor can reach must be addressable.
    pub fn validate(&self) -> Result<()> {
        match self.y.checked_add(self.height - 1) {
            Some(_) => Ok(()),
            None => Err(Error::config(format!(
                "location {} runs past the last addressable row",
                self
            ))),
        }
    }

    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Cell the cursor currently points at.
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y + self.index)
    }

    /// Move the cursor by `distance` rows, wrapping within the height.
    pub fn scroll(&mut self, distance: i64) -> u32 {
        let wrapped = (i64::from(self.index) + distance).rem_euclid(i64::from(self.height));
        self.index = wrapped as u32;
        self.index
    }

    /// Scroll one row in the direction encoded by a relative encoder value.
    pub fn scroll_by_control(&mut self, value: u8) -> u32 {
        let distance = if value > SCROLL_UP_ABOVE { -1 } else { 1 };
        self.scroll(distance)
    }

    pub fn reset_index(&mut self) {
        self.index = 0;
    }

    fn carry_index_from(&mut self, other: &Location) {
        self.index = other.index % self.height;
    }
}

/// Parses `X;Y` or `X;Y;HEIGHT`.
impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::config(format!("location '{}': expected X;Y[;HEIGHT]", s));
        let parts = s
            .split(';')
            .map(|part| part.trim().parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match parts.as_slice() {
            [x, y] => Location::with_height(*x, *y, DEFAULT_HEIGHT),
            [x, y, height] => Location::with_height(*x, *y, *height),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.x, self.y, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct LocationManager {
    locations: Vec<Location>,
    current: usize,
    reset_indices_on_switch: bool,
    carry_over_indices_on_switch: bool,
}

impl LocationManager {
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        if locations.is_empty() {
            return Err(Error::config("at least one location is required"));
        }
        for location in &locations {
            location.validate()?;
        }
        Ok(Self {
            locations,
            current: 0,
            reset_indices_on_switch: false,
            carry_over_indices_on_switch: true,
        })
    }

    /// Rewind a location's cursor when leaving it. Takes precedence over carry-over.
    pub fn reset_indices_on_switch(mut self, enabled: bool) -> Self {
        self.reset_indices_on_switch = enabled;
        self
    }

    /// Keep the scroll offset when jumping forward to the next location.
    pub fn carry_over_indices_on_switch(mut self, enabled: bool) -> Self {
        self.carry_over_indices_on_switch = enabled;
        self
    }

    #[inline]
    pub fn current(&self) -> &Location {
        &self.locations[self.current]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut Location {
        &mut self.locations[self.current]
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn next(&mut self) -> &Location {
        let previous = self.current;
        self.current = (self.current + 1) % self.locations.len();
        if self.reset_indices_on_switch {
            self.locations[previous].reset_index();
        } else if self.carry_over_indices_on_switch {
            let left = self.locations[previous];
            self.locations[self.current].carry_index_from(&left);
        }
        self.current()
    }

    pub fn previous(&mut self) -> &Location {
        if self.reset_indices_on_switch {
            self.current_mut().reset_index();
        }
        let len = self.locations.len();
        self.current = (self.current + len - 1) % len;
        self.current()
    }
}
