//! Bounding boxes and view state for toolpath geometry.

use gcodeview_core::Position;
use serde::{Deserialize, Serialize};

/// Bounding box accumulator used while parsing toolpaths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min_x: f32::MAX,
            max_x: f32::MIN,
            min_y: f32::MAX,
            max_y: f32::MIN,
            min_z: f32::MAX,
            max_z: f32::MIN,
        }
    }

    /// Bounds of a point sequence; invalid when the sequence is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Position>) -> Self {
        let mut bounds = Self::new();
        for p in points {
            bounds.update_position(p);
        }
        bounds
    }

    pub fn update(&mut self, x: f32, y: f32, z: f32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    #[inline]
    pub fn update_position(&mut self, p: &Position) {
        self.update(p.x, p.y, p.z);
    }

    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_z.is_finite()
            && self.max_z.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
            // Z might be single plane (min_z == max_z) which is valid
            && self.min_z <= self.max_z
    }

    pub fn width(&self) -> f32 {
        if self.is_valid() {
            self.max_x - self.min_x
        } else {
            0.0
        }
    }

    pub fn height(&self) -> f32 {
        if self.is_valid() {
            self.max_y - self.min_y
        } else {
            0.0
        }
    }

    pub fn depth(&self) -> f32 {
        if self.is_valid() {
            self.max_z - self.min_z
        } else {
            0.0
        }
    }

    /// Area of the XY footprint.
    pub fn area_xy(&self) -> f32 {
        self.width() * self.height()
    }

    /// Grow every side by `padding_factor` of the extent; flat Z gets 1 unit.
    pub fn with_padding(self, padding_factor: f32) -> Self {
        if !self.is_valid() {
            return self;
        }

        let padding_x = self.width() * padding_factor;
        let padding_y = self.height() * padding_factor;
        let padding_z = if self.max_z > self.min_z {
            self.depth() * padding_factor
        } else {
            1.0
        };

        Self {
            min_x: self.min_x - padding_x,
            max_x: self.max_x + padding_x,
            min_y: self.min_y - padding_y,
            max_y: self.max_y + padding_y,
            min_z: self.min_z - padding_z,
            max_z: self.max_z + padding_z,
        }
    }
}

/// Current camera over the toolpath
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Pixels per document unit
    pub zoom: f32,
    /// Pan offset in document units
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewState {
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bounds_are_invalid() {
        let bounds = Bounds::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.area_xy(), 0.0);
    }

    #[test]
    fn test_from_points() {
        let points = [
            Position::new(1.0, 2.0, 0.0),
            Position::new(-3.0, 5.0, -1.0),
            Position::new(4.0, 0.0, 2.0),
        ];
        let bounds = Bounds::from_points(&points);
        assert!(bounds.is_valid());
        assert_eq!(bounds.width(), 7.0);
        assert_eq!(bounds.height(), 5.0);
        assert_eq!(bounds.depth(), 3.0);
        assert_eq!(bounds.area_xy(), 35.0);
    }

    #[test]
    fn test_single_point_is_valid() {
        let bounds = Bounds::from_points(&[Position::new(1.0, 1.0, 1.0)]);
        assert!(bounds.is_valid());
        assert_eq!(bounds.area_xy(), 0.0);
    }

    #[test]
    fn test_padding_flat_z() {
        let bounds = Bounds::from_points(&[Position::origin(), Position::new(10.0, 20.0, 0.0)])
            .with_padding(0.1);
        assert_eq!(bounds.min_x, -1.0);
        assert_eq!(bounds.max_y, 22.0);
        assert_eq!(bounds.min_z, -1.0);
        assert_eq!(bounds.max_z, 1.0);
    }
}
