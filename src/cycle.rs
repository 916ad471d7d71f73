//! Sexagenary cycle labels and solar terms.

use crate::consts::{BRANCH_NAMES, SOLAR_TERM_NAMES, STEM_NAMES};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A name that matches none of the labels of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} name: {name}")]
pub struct UnknownName {
    kind: &'static str,
    name: String,
}

fn position(names: &[&str], kind: &'static str, name: &str) -> Result<u8, UnknownName> {
    names
        .iter()
        .position(|candidate| *candidate == name)
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| UnknownName {
            kind,
            name: name.to_owned(),
        })
}

/// One of the ten heavenly stems (天干), `0` is 甲 and `9` is 癸.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub struct Stem(u8);

impl Stem {
    /// Number of stems in the cycle
    pub const COUNT: u8 = 10;

    /// Returns the stem at `index`, or `None` if it is not in `0..=9`
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the stem index as u8
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the localized name, e.g. `辛`
    pub const fn name(self) -> &'static str {
        STEM_NAMES[self.0 as usize]
    }

    /// Returns the next stem, wrapping from 癸 back to 甲
    pub const fn succ(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stem {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        position(&STEM_NAMES, "stem", s.trim()).map(Self)
    }
}

impl TryFrom<String> for Stem {
    type Error = UnknownName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Stem> for &'static str {
    fn from(stem: Stem) -> Self {
        stem.name()
    }
}

/// One of the twelve earthly branches (地支), `0` is 子 and `11` is 亥.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub struct Branch(u8);

impl Branch {
    /// Number of branches in the cycle
    pub const COUNT: u8 = 12;

    /// Returns the branch at `index`, or `None` if it is not in `0..=11`
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the branch index as u8
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the localized name, e.g. `丑`
    pub const fn name(self) -> &'static str {
        BRANCH_NAMES[self.0 as usize]
    }

    /// Returns the next branch, wrapping from 亥 back to 子
    pub const fn succ(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Branch {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        position(&BRANCH_NAMES, "branch", s.trim()).map(Self)
    }
}

impl TryFrom<String> for Branch {
    type Error = UnknownName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Branch> for &'static str {
    fn from(branch: Branch) -> Self {
        branch.name()
    }
}

/// One of the 24 solar terms (節氣), numbered in solar calendar order from
/// `0` (小寒, early January) to `23` (冬至, late December).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub struct SolarTerm(u8);

impl SolarTerm {
    /// Number of solar terms in a solar year
    pub const COUNT: u8 = 24;

    /// Returns the term at `index`, or `None` if it is not in `0..=23`
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the two terms falling in solar `month` (1..=12), in order.
    ///
    /// Month `m` holds terms `2m-2` and `2m-1`, so February yields 立春 and 雨水.
    pub const fn of_month(month: u8) -> Option<(Self, Self)> {
        if month == 0 || month > 12 {
            return None;
        }
        let first = (month - 1) * 2;
        Some((Self(first), Self(first + 1)))
    }

    /// Returns the term index as u8
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the localized name, e.g. `立春`
    pub const fn name(self) -> &'static str {
        SOLAR_TERM_NAMES[self.0 as usize]
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolarTerm {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        position(&SOLAR_TERM_NAMES, "solar term", s.trim()).map(Self)
    }
}

impl TryFrom<String> for SolarTerm {
    type Error = UnknownName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SolarTerm> for &'static str {
    fn from(term: SolarTerm) -> Self {
        term.name()
    }
}
