use crate::Vec2;

/// A 2D rectangle, used for screen windows and camera-grid extents.
///
/// Unlike [`crate::Aabb`] the corners are stored as given; a window with
/// `min.y > max.y` is legal and flips the vertical raster axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from `[x_min, x_max, y_min, y_max]`, the scene-description ordering.
    pub fn from_extents(extents: [f32; 4]) -> Self {
        Self {
            min: Vec2::new(extents[0], extents[2]),
            max: Vec2::new(extents[1], extents[3]),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

}
