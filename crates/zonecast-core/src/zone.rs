// Strike-zone geometry: the 13 zone identifiers, the catcher-to-pitcher
// mirror, and the plot coordinates each zone is drawn at.
//
// Catcher POV grid (as reported by the feed):
//
//   11 |       | 12
//      | 1 2 3 |
//      | 4 5 6 |
//      | 7 8 9 |
//   13 |       | 14

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ZoneError;

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// One of the 13 valid zone identifiers. Construction validates the value,
/// so every `Zone` in hand is inside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Zone(u8);

impl Zone {
    /// All 13 zones: the 3x3 strike zone followed by the four chase zones.
    pub const ALL: [Zone; 13] = [
        Zone(1),
        Zone(2),
        Zone(3),
        Zone(4),
        Zone(5),
        Zone(6),
        Zone(7),
        Zone(8),
        Zone(9),
        Zone(11),
        Zone(12),
        Zone(13),
        Zone(14),
    ];

    /// The nine zones inside the strike zone.
    pub const STRIKE: [Zone; 9] = [
        Zone(1),
        Zone(2),
        Zone(3),
        Zone(4),
        Zone(5),
        Zone(6),
        Zone(7),
        Zone(8),
        Zone(9),
    ];

    /// Validate a raw zone value from upstream data.
    pub fn new(value: i64) -> Result<Zone, ZoneError> {
        match value {
            1..=9 | 11..=14 => Ok(Zone(value as u8)),
            other => Err(ZoneError::UnknownZone(other)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// True for zones 1-9.
    pub fn in_strike_zone(self) -> bool {
        self.0 <= 9
    }
}

impl TryFrom<i64> for Zone {
    type Error = ZoneError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Zone::new(value)
    }
}

impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Zone::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// Plot position of a zone's label. Zones 1-9 sit on x in {3,5,7} and
/// y in {3,1,-1}; chase zones sit on the outer corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneCoord {
    pub x: i8,
    pub y: i8,
}

impl ZoneCoord {
    pub const fn new(x: i8, y: i8) -> Self {
        ZoneCoord { x, y }
    }
}

impl fmt::Display for ZoneCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Remaps
// ---------------------------------------------------------------------------

/// Mirror a catcher-POV zone into the pitcher's view. Involutive: applying
/// it twice returns the input.
pub fn remap_catcher_to_pitcher(zone: Zone) -> Zone {
    let mirrored = match zone.0 {
        1 => 3,
        3 => 1,
        4 => 6,
        6 => 4,
        7 => 9,
        9 => 7,
        11 => 12,
        12 => 11,
        13 => 14,
        14 => 13,
        fixed => fixed,
    };
    Zone(mirrored)
}

/// Plot coordinate for a zone.
pub fn zone_to_coordinates(zone: Zone) -> ZoneCoord {
    let (x, y) = match zone.0 {
        1 => (3, 3),
        2 => (5, 3),
        3 => (7, 3),
        4 => (3, 1),
        5 => (5, 1),
        6 => (7, 1),
        7 => (3, -1),
        8 => (5, -1),
        9 => (7, -1),
        11 => (1, 5),
        12 => (9, 5),
        13 => (1, -3),
        _ => (9, -3),
    };
    ZoneCoord::new(x, y)
}

/// Re-key a catcher-POV mapping into pitcher POV, values untouched.
pub fn remap_for_pitchers_pov<V>(data: BTreeMap<Zone, V>) -> BTreeMap<Zone, V> {
    data.into_iter()
        .map(|(zone, value)| (remap_catcher_to_pitcher(zone), value))
        .collect()
}

/// Same as [`remap_for_pitchers_pov`] for raw integer keys. Fails on the
/// first key outside the domain.
pub fn remap_raw_for_pitchers_pov<V, I>(data: I) -> Result<BTreeMap<Zone, V>, ZoneError>
where
    I: IntoIterator<Item = (i64, V)>,
{
    data.into_iter()
        .map(|(raw, value)| Ok((remap_catcher_to_pitcher(Zone::new(raw)?), value)))
        .collect()
}

/// Re-key a zone mapping by plot coordinate.
pub fn remap_to_coordinates<V>(data: BTreeMap<Zone, V>) -> BTreeMap<ZoneCoord, V> {
    data.into_iter()
        .map(|(zone, value)| (zone_to_coordinates(zone), value))
        .collect()
}

// ---------------------------------------------------------------------------
// Drawing geometry
// ---------------------------------------------------------------------------

/// Strike-zone outline as a closed polyline.
pub const STRIKE_ZONE_OUTLINE: [(f64, f64); 5] =
    [(2.0, 4.0), (8.0, 4.0), (8.0, -2.0), (2.0, -2.0), (2.0, 4.0)];

/// Outer box around the chase zones as a closed polyline.
pub const OUTER_OUTLINE: [(f64, f64); 5] =
    [(0.0, 6.0), (10.0, 6.0), (10.0, -4.0), (0.0, -4.0), (0.0, 6.0)];

/// Interior grid and chase-zone dividers, as line segments.
pub const GRID_LINES: [((f64, f64), (f64, f64)); 8] = [
    ((4.0, 4.0), (4.0, -2.0)),
    ((6.0, 4.0), (6.0, -2.0)),
    ((2.0, 2.0), (8.0, 2.0)),
    ((2.0, 0.0), (8.0, 0.0)),
    ((5.0, 6.0), (5.0, 4.0)),
    ((5.0, -2.0), (5.0, -4.0)),
    ((0.0, 1.0), (2.0, 1.0)),
    ((8.0, 1.0), (10.0, 1.0)),
];

/// Polygon covering the region labelled at `coord`. Chase zones are
/// L-shaped and wrap the corner of the strike zone.
pub fn region_outline(coord: ZoneCoord) -> &'static [(f64, f64)] {
    match (coord.x, coord.y) {
        (3, 3) => &[(2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)],
        (5, 3) => &[(4.0, 4.0), (6.0, 4.0), (6.0, 2.0), (4.0, 2.0)],
        (7, 3) => &[(6.0, 4.0), (8.0, 4.0), (8.0, 2.0), (6.0, 2.0)],
        (3, 1) => &[(2.0, 2.0), (4.0, 2.0), (4.0, 0.0), (2.0, 0.0)],
        (5, 1) => &[(4.0, 2.0), (6.0, 2.0), (6.0, 0.0), (4.0, 0.0)],
        (7, 1) => &[(6.0, 2.0), (8.0, 2.0), (8.0, 0.0), (6.0, 0.0)],
        (3, -1) => &[(2.0, 0.0), (4.0, 0.0), (4.0, -2.0), (2.0, -2.0)],
        (5, -1) => &[(4.0, 0.0), (6.0, 0.0), (6.0, -2.0), (4.0, -2.0)],
        (7, -1) => &[(6.0, 0.0), (8.0, 0.0), (8.0, -2.0), (6.0, -2.0)],
        (1, 5) => &[(0.0, 6.0), (5.0, 6.0), (5.0, 4.0), (2.0, 4.0), (2.0, 1.0), (0.0, 1.0)],
        (9, 5) => &[(5.0, 6.0), (10.0, 6.0), (10.0, 1.0), (8.0, 1.0), (8.0, 4.0), (5.0, 4.0)],
        (1, -3) => &[(0.0, 1.0), (2.0, 1.0), (2.0, -2.0), (5.0, -2.0), (5.0, -4.0), (0.0, -4.0)],
        (9, -3) => &[(8.0, 1.0), (10.0, 1.0), (10.0, -4.0), (5.0, -4.0), (5.0, -2.0), (8.0, -2.0)],
        _ => &[],
    }
}

/// Even-odd point-in-polygon test, used to rasterize region fills.
pub fn polygon_contains(polygon: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
