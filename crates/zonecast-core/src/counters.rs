// Per-zone counter records.
//
// One zero-initialized structure keyed by a fixed zone domain, holding a
// metric-specific counter record per zone. Zones outside the domain are
// rejected on lookup.

use std::collections::BTreeMap;

use crate::error::ZoneError;
use crate::zone::Zone;

#[derive(Debug, Clone)]
pub struct ZoneCounters<C> {
    metric: &'static str,
    counts: BTreeMap<Zone, C>,
}

impl<C: Default> ZoneCounters<C> {
    /// Seed one zeroed record per zone in `zones`.
    pub fn new(metric: &'static str, zones: &[Zone]) -> Self {
        let counts = zones.iter().map(|z| (*z, C::default())).collect();
        ZoneCounters { metric, counts }
    }
}

impl<C> ZoneCounters<C> {
    pub fn get(&self, zone: Zone) -> Result<&C, ZoneError> {
        self.counts.get(&zone).ok_or(ZoneError::UntrackedZone {
            zone,
            metric: self.metric,
        })
    }

    pub fn get_mut(&mut self, zone: Zone) -> Result<&mut C, ZoneError> {
        let metric = self.metric;
        self.counts
            .get_mut(&zone)
            .ok_or(ZoneError::UntrackedZone { zone, metric })
    }

    pub fn tracks(&self, zone: Zone) -> bool {
        self.counts.contains_key(&zone)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, &C)> {
        self.counts.iter().map(|(z, c)| (*z, c))
    }

    /// Convert each zone's record to a value, keeping every zone.
    pub fn map_values<V>(&self, mut f: impl FnMut(&C) -> V) -> BTreeMap<Zone, V> {
        self.counts.iter().map(|(z, c)| (*z, f(c))).collect()
    }
}

// ---------------------------------------------------------------------------
// Counter records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwingCounts {
    pub swings: u32,
    pub misses: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalledStrikeCounts {
    pub called_strikes: u32,
    pub total_pitches: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SluggingCounts {
    pub total_bases: u32,
    pub at_bats: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnBaseCounts {
    pub at_bats: u32,
    pub hits: u32,
    pub walks: u32,
    pub hbp: u32,
    pub sf: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AverageCounts {
    pub hits: u32,
    pub at_bats: u32,
}

// ---------------------------------------------------------------------------
// Ratio helper
// ---------------------------------------------------------------------------

/// `numerator / denominator` rounded to three decimals. A zero denominator
/// yields exactly 0.0 so every zone still has a plottable value.
pub fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round3(numerator as f64 / denominator as f64)
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_zeroed_records() {
        let counters: ZoneCounters<SwingCounts> = ZoneCounters::new("swing", &Zone::ALL);
        assert_eq!(counters.len(), 13);
        assert!(counters.iter().all(|(_, c)| *c == SwingCounts::default()));
    }

    #[test]
    fn untracked_zone_is_an_error() {
        let mut counters: ZoneCounters<CalledStrikeCounts> =
            ZoneCounters::new("called strike", &Zone::STRIKE);
        let chase = Zone::new(11).unwrap();
        assert!(!counters.tracks(chase));
        match counters.get_mut(chase) {
            Err(ZoneError::UntrackedZone { zone, metric }) => {
                assert_eq!(zone, chase);
                assert_eq!(metric, "called strike");
            }
            other => panic!("expected UntrackedZone, got {other:?}"),
        }
    }

    #[test]
    fn get_mut_accumulates() {
        let mut counters: ZoneCounters<SluggingCounts> = ZoneCounters::new("slg", &Zone::ALL);
        let z = Zone::new(5).unwrap();
        counters.get_mut(z).unwrap().at_bats += 2;
        counters.get_mut(z).unwrap().total_bases += 4;
        assert_eq!(
            *counters.get(z).unwrap(),
            SluggingCounts { total_bases: 4, at_bats: 2 }
        );
    }

    #[test]
    fn ratio_zero_denominator_is_zero() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(5, 0), 0.0);
        assert!(!ratio(0, 0).is_nan());
    }

    #[test]
    fn ratio_rounds_to_three_places() {
        assert_eq!(ratio(1, 3), 0.333);
        assert_eq!(ratio(2, 3), 0.667);
        assert_eq!(ratio(5, 4), 1.25);
    }
}
