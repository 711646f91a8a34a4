use std::collections::HashMap;

use glam::Vec2;
use log::{info, warn};

use super::geometry::{Level, LevelError, Sector, SectorId};
use super::math::{order_walls_into_polygon, point_in_polygon};

// ──────────────────────────────────────────────────────────────────────────
//                       Level – construction
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Order every sector's walls into a polygon and validate portals.
    pub fn new(sectors: impl IntoIterator<Item = (SectorId, Sector)>) -> Result<Self, LevelError> {
        let mut map: HashMap<SectorId, Sector> = HashMap::new();
        for (id, mut sector) in sectors {
            order_walls_into_polygon(&mut sector.walls);
            map.insert(id, sector);
        }

        let level = Self { sectors: map };
        level.validate()?;
        level.flag_closed_openings();

        info!(
            "level built: {} sectors, {} walls",
            level.sectors.len(),
            level.sectors.values().map(|s| s.walls.len()).sum::<usize>()
        );
        Ok(level)
    }

    /// Referential integrity: every sector closes a polygon and every portal
    /// names another existing sector.
    pub fn validate(&self) -> Result<(), LevelError> {
        for id in self.sector_ids() {
            let sector = &self.sectors[&id];
            if sector.walls.len() < 3 {
                return Err(LevelError::DegenerateSector {
                    sector: id,
                    walls: sector.walls.len(),
                });
            }
            for (wall, target) in sector.portals() {
                if target == id {
                    return Err(LevelError::SelfPortal { sector: id, wall });
                }
                if !self.sectors.contains_key(&target) {
                    return Err(LevelError::DanglingPortal {
                        sector: id,
                        wall,
                        target,
                    });
                }
            }
        }
        Ok(())
    }

    /// Swap in an edited sector, re-ordering its walls. The level is left
    /// untouched when the result would not validate.
    pub fn replace_sector(&mut self, id: SectorId, mut sector: Sector) -> Result<(), LevelError> {
        if !self.sectors.contains_key(&id) {
            return Err(LevelError::UnknownSector(id));
        }
        order_walls_into_polygon(&mut sector.walls);

        let previous = self.sectors.insert(id, sector);
        if let Err(e) = self.validate() {
            if let Some(previous) = previous {
                self.sectors.insert(id, previous);
            }
            return Err(e);
        }
        self.flag_closed_openings();
        Ok(())
    }

    // A neighbor whose ceiling sits at or below this floor (or whose floor
    // sits at or above this ceiling) leaves no opening. The border maths do
    // not special-case it, so it is only reported.
    fn flag_closed_openings(&self) {
        for id in self.sector_ids() {
            let here = &self.sectors[&id];
            for (wall, to) in here.portals() {
                let there = &self.sectors[&to];
                if there.ceiling <= here.floor || there.floor >= here.ceiling {
                    warn!(
                        "portal {id}:{wall} -> {to} has no vertical opening \
                         (floor {:.2}/{:.2}, ceiling {:.2}/{:.2})",
                        here.floor, there.floor, here.ceiling, there.ceiling
                    );
                }
            }
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – lookups
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    #[inline]
    pub fn contains(&self, id: SectorId) -> bool {
        self.sectors.contains_key(&id)
    }

    /// Panics on an unknown id; use after validation only.
    #[inline]
    pub fn at(&self, id: SectorId) -> &Sector {
        match self.sectors.get(&id) {
            Some(s) => s,
            None => panic!("sector {id} is not part of the level"),
        }
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Sector ids in ascending order.
    pub fn sector_ids(&self) -> Vec<SectorId> {
        let mut ids: Vec<SectorId> = self.sectors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// First sector (lowest id) whose polygon contains `p`.
    ///
    /// `None` is an expected answer: sectors need not tile the plane, and
    /// callers keep their last known sector in that case.
    pub fn find_sector_containing(&self, p: Vec2) -> Option<SectorId> {
        self.sector_ids()
            .into_iter()
            .find(|id| point_in_polygon(p, &self.sectors[id].walls))
    }
}
