use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How coordinates outside an axis of length `len` are resolved.
///
/// Numeric codes follow the conventional ordering used by image libraries:
/// `Constant = 0` through `Reflect101 = 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderType {
    /// Out-of-range positions take a fill value.
    Constant,
    /// `aaa|abcd|ddd`
    Replicate,
    /// `cba|abcd|dcb`, edge sample repeated.
    Reflect,
    /// `bcd|abcd|abc`
    Wrap,
    /// `dcb|abcd|cba`, edge sample not repeated.
    Reflect101,
}

impl BorderType {
    pub const ALL: [BorderType; 5] = [
        BorderType::Constant,
        BorderType::Replicate,
        BorderType::Reflect,
        BorderType::Wrap,
        BorderType::Reflect101,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            BorderType::Constant => "constant",
            BorderType::Replicate => "replicate",
            BorderType::Reflect => "reflect",
            BorderType::Wrap => "wrap",
            BorderType::Reflect101 => "reflect101",
        }
    }
}

impl TryFrom<u32> for BorderType {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        BorderType::ALL
            .get(code as usize)
            .copied()
            .ok_or(Error::InvalidBorderType(code))
    }
}

impl FromStr for BorderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        if let Some(border) = BorderType::ALL.into_iter().find(|b| b.name() == lower) {
            return Ok(border);
        }
        match s.parse::<u32>() {
            Ok(code) => BorderType::try_from(code),
            Err(_) => Err(Error::InvalidArgument(format!("unknown border type '{s}'"))),
        }
    }
}

impl fmt::Display for BorderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a possibly out-of-range index `i` onto `0..len`.
///
/// In-range indices map to themselves. Out-of-range indices map to `None`
/// under [`BorderType::Constant`], meaning the fill value is used. Empty axes
/// always map to `None`.
pub fn map_index(i: isize, len: usize, border: BorderType) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i >= 0 && (i as usize) < len {
        return Some(i as usize);
    }
    let last = len - 1;

    match border {
        BorderType::Constant => None,
        BorderType::Replicate => {
            if i < 0 {
                Some(0)
            } else {
                Some((i as usize).min(last))
            }
        }
        BorderType::Wrap => Some(i.rem_euclid(len as isize) as usize),
        BorderType::Reflect => {
            let period = 2 * len;
            let r = i.rem_euclid(period as isize) as usize;
            if r < len { Some(r) } else { Some(period - 1 - r) }
        }
        BorderType::Reflect101 => {
            if len == 1 {
                return Some(0);
            }

            let period = 2 * len - 2;
            let r = i.rem_euclid(period as isize) as usize;
            if r < len { Some(r) } else { Some(period - r) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderType, map_index};
    use crate::error::Error;

    #[test]
    fn every_policy_extends_abcd() {
        // a b c d at indices 0..4, probed from -5 through 8
        let table: [(BorderType, [Option<usize>; 14]); 5] = [
            (
                BorderType::Constant,
                [
                    None,
                    None,
                    None,
                    None,
                    None,
                    Some(0),
                    Some(1),
                    Some(2),
                    Some(3),
                    None,
                    None,
                    None,
                    None,
                    None,
                ],
            ),
            (
                BorderType::Replicate,
                [0, 0, 0, 0, 0, 0, 1, 2, 3, 3, 3, 3, 3, 3].map(Some),
            ),
            (
                BorderType::Reflect,
                [3, 3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0, 0].map(Some),
            ),
            (
                BorderType::Wrap,
                [3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0].map(Some),
            ),
            (
                BorderType::Reflect101,
                [1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0, 1, 2].map(Some),
            ),
        ];

        for (border, expected) in table {
            for (i, want) in (-5..=8).zip(expected) {
                assert_eq!(map_index(i, 4, border), want, "{border} i = {i}");
            }
        }
    }

    #[test]
    fn short_axes_stay_in_range() {
        for border in BorderType::ALL {
            let outside = if border == BorderType::Constant { None } else { Some(0) };
            for i in [-7, -1, 1, 9] {
                assert_eq!(map_index(i, 1, border), outside, "{border} i = {i}");
            }
        }

        // two samples: Wrap and Reflect101 coincide
        let len2 = [
            (BorderType::Replicate, [0, 0, 0, 1, 1, 1]),
            (BorderType::Reflect, [1, 0, 0, 1, 1, 0]),
            (BorderType::Wrap, [0, 1, 0, 1, 0, 1]),
            (BorderType::Reflect101, [0, 1, 0, 1, 0, 1]),
        ];
        for (border, expected) in len2 {
            for (i, want) in (-2..=3).zip(expected) {
                assert_eq!(map_index(i, 2, border), Some(want), "{border} i = {i}");
            }
        }

        assert_ne!(
            map_index(-1, 4, BorderType::Reflect),
            map_index(-1, 4, BorderType::Reflect101)
        );
    }

    #[test]
    fn in_range_is_identity_and_constant_is_none_outside() {
        for border in BorderType::ALL {
            for len in 1..6usize {
                for i in 0..len {
                    assert_eq!(map_index(i as isize, len, border), Some(i));
                }
                assert_eq!(map_index(0, 0, border), None);
            }
        }
        assert_eq!(map_index(-1, 5, BorderType::Constant), None);
        assert_eq!(map_index(5, 5, BorderType::Constant), None);
    }

    #[test]
    fn codes_and_names() {
        for (code, border) in BorderType::ALL.into_iter().enumerate() {
            assert_eq!(BorderType::try_from(code as u32), Ok(border));
            assert_eq!(border.code(), code as u32);
            assert_eq!(border.name().parse::<BorderType>(), Ok(border));
        }
        assert_eq!(BorderType::try_from(255), Err(Error::InvalidBorderType(255)));
        assert_eq!("Reflect101".parse::<BorderType>(), Ok(BorderType::Reflect101));
        assert_eq!("3".parse::<BorderType>(), Ok(BorderType::Wrap));
        assert!("mirror".parse::<BorderType>().is_err());

        let json = serde_json::to_string(&BorderType::Reflect101).expect("serialize");
        assert_eq!(json, "\"reflect101\"");
        let back: BorderType = serde_json::from_str("\"wrap\"").expect("deserialize");
        assert_eq!(back, BorderType::Wrap);
    }
}
