//! Depth shading helper
//!
//! Maps every distinct Z height of a toolpath to a position in `[0, 1]`
//! across the document's Z range, for depth-based colouring.

use gcodeview_core::constants::POSITION_EPSILON;
use serde::{Deserialize, Serialize};

/// One distinct Z height and its normalized level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZLevel {
    pub z: f32,
    pub level: f32,
}

/// Distinct Z heights in ascending order with their levels
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZLevelMap {
    levels: Vec<ZLevel>,
}

impl ZLevelMap {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[ZLevel] {
        &self.levels
    }

    /// Level of `z`, matched within [`POSITION_EPSILON`]
    pub fn level_of(&self, z: f32) -> Option<f32> {
        let idx = self.levels.partition_point(|l| l.z < z - POSITION_EPSILON);
        self.levels
            .get(idx)
            .filter(|l| (l.z - z).abs() <= POSITION_EPSILON)
            .map(|l| l.level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZLevel> {
        self.levels.iter()
    }
}

/// Build the level map for a Z stream. Non-finite values are ignored.
///
/// Heights within [`POSITION_EPSILON`] of each other merge into one level, so
/// a stream whose whole range is under that tolerance yields a single level
/// at 0.5.
pub fn z_levels(z_values: &[f32]) -> ZLevelMap {
    let mut distinct: Vec<f32> = z_values.iter().copied().filter(|z| z.is_finite()).collect();
    distinct.sort_by(f32::total_cmp);
    distinct.dedup_by(|a, b| (*a - *b).abs() <= POSITION_EPSILON);

    let levels = match distinct.as_slice() {
        [] => Vec::new(),
        [z] => vec![ZLevel { z: *z, level: 0.5 }],
        [min, .., max] => {
            let (min, range) = (*min, *max - *min);
            distinct
                .iter()
                .map(|&z| ZLevel {
                    z,
                    level: (z - min) / range,
                })
                .collect()
        }
    };
    ZLevelMap { levels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream() {
        assert!(z_levels(&[]).is_empty());
    }

    #[test]
    fn test_single_value_is_centered() {
        let map = z_levels(&[2.0, 2.0, 2.0]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.level_of(2.0), Some(0.5));
    }

    #[test]
    fn test_min_max_normalization() {
        let map = z_levels(&[5.0, -1.0, 0.0, 5.0, -1.0]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.level_of(-1.0), Some(0.0));
        assert_eq!(map.level_of(5.0), Some(1.0));
        let mid = map.level_of(0.0).unwrap();
        assert!((mid - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_range_under_tolerance_is_one_level() {
        let map = z_levels(&[1.0, 1.0 + 5e-7, 1.00005]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.level_of(1.0), Some(0.5));
    }

    #[test]
    fn test_heights_just_past_tolerance_are_distinct() {
        let map = z_levels(&[1.0, 1.0005]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.level_of(1.0), Some(0.0));
        assert_eq!(map.level_of(1.0005), Some(1.0));
    }

    #[test]
    fn test_unknown_z_and_tolerance() {
        let map = z_levels(&[0.0, 10.0]);
        assert_eq!(map.level_of(3.0), None);
        assert_eq!(map.level_of(10.00005), Some(1.0));
    }
}
