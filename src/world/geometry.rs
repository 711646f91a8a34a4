use std::collections::HashMap;

use crate::renderer::color::{Color, PURPLE, RED, WHITE};

use super::math::Segment;

pub type SectorId = u32;
/// Index of a wall inside its sector's (ordered) wall list.
pub type WallId = usize;

/// Runtime snapshot of one map. Built through [`Level::new`], which orders
/// every sector's walls and checks that each portal names an existing sector.
#[derive(Clone, Debug, Default)]
pub struct Level {
    pub(super) sectors: HashMap<SectorId, Sector>,
}

/*--------------------------- walls -----------------------------------*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub segment: Segment,
    pub color: Color,
    /// Destination sector; `None` for a solid wall.
    pub portal: Option<SectorId>,
}

impl Wall {
    pub const fn solid(segment: Segment, color: Color) -> Self {
        Self {
            segment,
            color,
            portal: None,
        }
    }

    pub const fn portal(segment: Segment, to: SectorId) -> Self {
        Self {
            segment,
            color: WHITE,
            portal: Some(to),
        }
    }

    #[inline]
    pub fn is_portal(&self) -> bool {
        self.portal.is_some()
    }
}

/*--------------------------- sectors ---------------------------------*/

/// Convex(-ish) region with its own floor and ceiling.
///
/// `floor` and `ceiling` are fractions of the projected wall height,
/// measured from the bottom of the wall: `0.0` = bottom, `1.0` = top.
#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    pub walls: Vec<Wall>,
    pub floor: f32,
    pub ceiling: f32,
    /// Step face drawn when this sector's ceiling is the lower one.
    pub top_border_color: Color,
    /// Step face drawn when this sector's floor is the higher one.
    pub bottom_border_color: Color,
}

impl Default for Sector {
    fn default() -> Self {
        Self {
            walls: Vec::new(),
            floor: 0.0,
            ceiling: 1.0,
            top_border_color: PURPLE,
            bottom_border_color: RED,
        }
    }
}

impl Sector {
    pub fn new(walls: Vec<Wall>) -> Self {
        Self {
            walls,
            ..Self::default()
        }
    }

    pub fn with_heights(mut self, floor: f32, ceiling: f32) -> Self {
        self.floor = floor;
        self.ceiling = ceiling;
        self
    }

    pub fn with_border_colors(mut self, top: Color, bottom: Color) -> Self {
        self.top_border_color = top;
        self.bottom_border_color = bottom;
        self
    }

    pub fn portals(&self) -> impl Iterator<Item = (WallId, SectorId)> + '_ {
        self.walls
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.portal.map(|to| (i, to)))
    }
}

/*----------------------------- errors --------------------------------*/

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("sector {sector} wall {wall} is a portal to unknown sector {target}")]
    DanglingPortal {
        sector: SectorId,
        wall: WallId,
        target: SectorId,
    },

    #[error("sector {sector} wall {wall} is a portal to its own sector")]
    SelfPortal { sector: SectorId, wall: WallId },

    #[error("sector {sector} has {walls} walls, a closed polygon needs at least 3")]
    DegenerateSector { sector: SectorId, walls: usize },

    #[error("sector {0} does not exist")]
    UnknownSector(SectorId),
}
