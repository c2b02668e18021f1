//! Tile and prop catalogs
//!
//! Catalogs are the external geometry source: ordered collections of
//! templates the track instantiates from. The system never generates
//! geometry itself; a template only carries what spawning needs, namely the
//! tile length and the attachment transforms where props may be placed.

use glam::{Quat, Vec3};

/// Which side of the road a point or placement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, in placement order
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Tile-local transform where a prop may be placed
#[derive(Debug, Clone, Copy)]
pub struct AttachPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

impl AttachPoint {
    /// Attachment point with an upright orientation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// One instantiable tile variant
#[derive(Debug, Clone)]
pub struct TileTemplate {
    pub name: String,
    /// Declared forward-axis length; must match the configured tile length
    pub length: f32,
    pub left_points: Vec<AttachPoint>,
    pub right_points: Vec<AttachPoint>,
}

impl TileTemplate {
    /// Attachment points declared on one side, in order
    pub fn points(&self, side: Side) -> &[AttachPoint] {
        match side {
            Side::Left => &self.left_points,
            Side::Right => &self.right_points,
        }
    }
}

/// One instantiable prop variant
///
/// Props carry no geometry of their own here; the template is an opaque
/// identity the renderer maps to an asset.
#[derive(Debug, Clone)]
pub struct PropTemplate {
    pub name: String,
}

impl PropTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered, non-empty collection of tile variants
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    templates: Vec<TileTemplate>,
}

impl TileCatalog {
    pub fn new(templates: Vec<TileTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, index: usize) -> Option<&TileTemplate> {
        self.templates.get(index)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileTemplate> {
        self.templates.iter()
    }
}

/// Ordered, possibly-empty collection of prop variants
///
/// An empty prop catalog is valid: tiles simply spawn bare.
#[derive(Debug, Clone, Default)]
pub struct PropCatalog {
    templates: Vec<PropTemplate>,
}

impl PropCatalog {
    pub fn new(templates: Vec<PropTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, index: usize) -> Option<&PropTemplate> {
        self.templates.get(index)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_points_by_side() {
        let template = TileTemplate {
            name: "straight".to_string(),
            length: 50.0,
            left_points: vec![AttachPoint::at(Vec3::new(10.0, 0.0, -12.0))],
            right_points: vec![
                AttachPoint::at(Vec3::new(10.0, 0.0, 12.0)),
                AttachPoint::at(Vec3::new(30.0, 0.0, 12.0)),
            ],
        };
        assert_eq!(template.points(Side::Left).len(), 1);
        assert_eq!(template.points(Side::Right).len(), 2);
    }

    #[test]
    fn test_empty_catalogs() {
        assert!(TileCatalog::default().is_empty());
        assert!(PropCatalog::default().is_empty());
        assert!(TileCatalog::default().get(0).is_none());
    }
}
