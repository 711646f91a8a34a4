//! ---------------------------------------------------------------------------
//! Portal rasterizer
//!
//! One ray per screen column, resolved against the walls of a single sector.
//! A solid hit closes the column; a portal hit draws the step faces between
//! the two sectors, narrows the column's open rows and queues the neighbor.
//!
//! Work is kept on an explicit LIFO of [`RenderArea`]s so a frame can be
//! drained in one go (`run_to_completion`) or one area at a time
//! (`step_once`) for step-through debugging.
//! ---------------------------------------------------------------------------

use glam::Vec2;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    engine::{
        projection::{ColumnExtent, Projector},
        types::{ColumnBound, RasterOptions, RenderArea, Screen},
    },
    renderer::{Color, Renderer},
    world::{
        Camera, Level, Sector, SectorId, Wall,
        math::{Hit, Ray, intersect_ray_segment, point_side},
    },
};

/// Areas discovered while rasterizing a single area; rarely more than a few.
type Discovered = SmallVec<[RenderArea; 4]>;

/*───────────────────────────────────────────────────────────────────────*/
/*                          Rasterization context                        */
/*───────────────────────────────────────────────────────────────────────*/

/// Resumable per-frame traversal state.
///
/// The level is borrowed for the whole pass and the camera is copied on
/// [`reset`](Self::reset), so neither can change under an unfinished pass.
pub struct Rasterizer<'a> {
    level: &'a Level,
    camera: Camera,
    screen: Screen,
    projector: Projector,
    options: RasterOptions,

    bounds: Vec<ColumnBound>,
    stack: Vec<RenderArea>,
    iteration: u32,
    discovered: Discovered,
}

impl<'a> Rasterizer<'a> {
    pub fn new(screen: Screen, level: &'a Level, camera: &Camera, options: RasterOptions) -> Self {
        let mut r = Self {
            level,
            camera: *camera,
            screen,
            projector: Projector::new(camera, screen),
            options,
            bounds: Vec::new(),
            stack: Vec::new(),
            iteration: 0,
            discovered: Discovered::new(),
        };
        r.reset(screen, level, camera);
        r
    }

    /// Start a new pass: full-height columns, one area spanning the screen
    /// against the camera's sector.
    ///
    /// Panics when the camera's sector is not part of `level`.
    pub fn reset(&mut self, screen: Screen, level: &'a Level, camera: &Camera) {
        assert!(
            level.contains(camera.current_sector),
            "rasterizer reset with camera in unknown sector {}",
            camera.current_sector
        );

        self.level = level;
        self.camera = *camera;
        self.screen = screen;
        self.projector = Projector::new(camera, screen);
        self.iteration = 0;
        self.discovered.clear();

        self.bounds.clear();
        self.bounds.resize(
            screen.w as usize,
            ColumnBound {
                min: 0,
                max: screen.h,
            },
        );

        self.stack.clear();
        if screen.w > 0 {
            self.stack.push(RenderArea {
                sector: camera.current_sector,
                x_begin: 0,
                x_end: screen.w - 1,
            });
        }

        debug!(
            "raster reset {}x{} sector {} budget {} pitch offset {}",
            screen.w,
            screen.h,
            camera.current_sector,
            camera.max_iterations,
            self.projector.pitch_offset()
        );
    }

    #[inline]
    pub fn has_remaining_work(&self) -> bool {
        !self.stack.is_empty() && self.iteration < self.camera.max_iterations
    }

    /// Pop one area, rasterize all of its columns into `out` and queue the
    /// neighbors seen through portals.
    ///
    /// Panics when called without remaining work.
    pub fn step_once<R: Renderer>(&mut self, out: &mut R) {
        assert!(
            self.has_remaining_work(),
            "step_once called with no remaining work"
        );
        let Some(area) = self.stack.pop() else {
            unreachable!("remaining work implies a pending area");
        };

        let level = self.level;
        let sector = level.at(area.sector);
        self.discovered.clear();

        for x in area.columns() {
            // solid hit earlier this pass
            if self.bounds[x as usize].is_closed() {
                continue;
            }
            let Some((wall, hit)) = self.nearest_wall(sector, x) else {
                continue;
            };

            match wall.portal {
                None => self.draw_solid(out, x, hit.distance, sector, wall),
                Some(to) => {
                    assert!(
                        level.contains(to),
                        "portal of sector {} leads to unknown sector {to}",
                        area.sector
                    );
                    self.draw_portal(out, x, hit.distance, sector, level.at(to));
                    self.note_discovered(to, x);
                }
            }
        }

        self.stack.extend(self.discovered.iter().copied());
        self.iteration += 1;

        trace!(
            "step {}: sector {} cols {}..={} -> {} new area(s), {} pending",
            self.iteration,
            area.sector,
            area.x_begin,
            area.x_end,
            self.discovered.len(),
            self.stack.len()
        );
    }

    pub fn run_to_completion<R: Renderer>(&mut self, out: &mut R) {
        while self.has_remaining_work() {
            self.step_once(out);
        }
    }

    /*────────────────────────── accessors ──────────────────────────*/

    /// Areas processed since the last reset.
    #[inline]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Areas queued by the most recent `step_once`, one per destination.
    #[inline]
    pub fn last_discovered(&self) -> &[RenderArea] {
        &self.discovered
    }

    /// Pending areas, the next one to be processed last.
    #[inline]
    pub fn pending(&self) -> &[RenderArea] {
        &self.stack
    }

    #[inline]
    pub fn column_bounds(&self) -> &[ColumnBound] {
        &self.bounds
    }

}

/*──────────────────────── column rendering ───────────────────────────*/

impl<'a> Rasterizer<'a> {
    /// Closest wall of `sector` along the ray of column `x`.
    ///
    /// Portals seen from behind are ignored. Ties keep the lowest wall index.
    fn nearest_wall<'s>(&self, sector: &'s Sector, x: u32) -> Option<(&'s Wall, Hit)> {
        let ray = Ray {
            origin: self.camera.pos,
            dir: self.camera.ray_dir_for_column(x, self.screen.w),
        };

        let mut best: Option<(&Wall, Hit)> = None;
        for wall in &sector.walls {
            let Some(hit) = intersect_ray_segment(&ray, &wall.segment) else {
                continue;
            };
            if wall.is_portal() && point_side(ray.origin, wall.segment.a, wall.segment.b) <= 0.0 {
                continue;
            }
            if best.is_none_or(|(_, b)| hit.distance < b.distance) {
                best = Some((wall, hit));
            }
        }
        best
    }

    fn draw_solid<R: Renderer>(
        &mut self,
        out: &mut R,
        x: u32,
        distance: f32,
        sector: &Sector,
        wall: &Wall,
    ) {
        let window = self.bounds[x as usize];
        let span = self
            .projector
            .between_heights(x, distance, window, sector.ceiling, sector.floor);
        if !span.is_empty() {
            self.draw_span(out, &span, wall.color, true, false);
        }

        // nothing behind a solid wall, even if a later area covers `x`
        self.bounds[x as usize].min = window.max;
    }

    /// Step faces between `here` and `next`, then narrow the column to the
    /// opening left between them.
    fn draw_portal<R: Renderer>(
        &mut self,
        out: &mut R,
        x: u32,
        distance: f32,
        here: &Sector,
        next: &Sector,
    ) {
        // TODO: a neighbor ceiling below this floor (or floor above this
        // ceiling) is not clamped against the opposing bound; see
        // Level::flag_closed_openings.
        let mut bound = self.bounds[x as usize];

        // Top: from this ceiling down to the lower of the two ceilings.
        let lower_ceiling = here.ceiling.min(next.ceiling);
        let top = self
            .projector
            .between_heights(x, distance, bound, here.ceiling, lower_ceiling);
        if next.ceiling < here.ceiling && !top.is_empty() {
            self.draw_span(out, &top, next.top_border_color, true, true);
        }
        bound.min = top.bottom.y as u32;

        // Bottom: from the higher of the two floors down to this floor.
        let higher_floor = here.floor.max(next.floor);
        let bottom = self
            .projector
            .between_heights(x, distance, bound, higher_floor, here.floor);
        if next.floor > here.floor && !bottom.is_empty() {
            self.draw_span(out, &bottom, next.bottom_border_color, true, true);
        }
        bound.max = bottom.top.y as u32;

        self.bounds[x as usize] = bound;

        if let Some(color) = self.options.portal_placeholder {
            if !bound.is_closed() {
                out.draw_column(x, bound.min as f32, bound.max as f32, color);
            }
        }
    }

    fn draw_span<R: Renderer>(
        &self,
        out: &mut R,
        span: &ColumnExtent,
        color: Color,
        mark_top: bool,
        mark_bottom: bool,
    ) {
        out.draw_column(
            span.top.x as u32,
            span.top.y,
            span.bottom.y,
            color.darken(span.normalized_depth),
        );

        if self.options.edge_markers {
            if mark_top {
                self.mark(out, span.top);
            }
            if mark_bottom {
                self.mark(out, span.bottom);
            }
        }
    }

    fn mark<R: Renderer>(&self, out: &mut R, tip: Vec2) {
        out.fill_rect(
            tip.x as i32 - 1,
            tip.y as i32 - 1,
            3,
            3,
            self.options.marker_color,
        );
    }

    /// Grow (or open) this pass's area for `to`. One area per destination,
    /// even when its columns are not contiguous.
    fn note_discovered(&mut self, to: SectorId, x: u32) {
        match self.discovered.iter_mut().find(|a| a.sector == to) {
            Some(area) => area.x_end = x,
            None => self.discovered.push(RenderArea {
                sector: to,
                x_begin: x,
                x_end: x,
            }),
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::{DrawCall, DrawList, Software, color::WHITE},
        world::{Segment, sample_camera, sample_level},
    };
    use glam::vec2;

    const W: u32 = 64;
    const H: u32 = 120;
    const STEP_RED: Color = Color::rgb(255, 0, 0);
    const SCREEN: Screen = Screen::new(W, H);

    fn solid(ax: f32, ay: f32, bx: f32, by: f32) -> Wall {
        Wall::solid(Segment::new(vec2(ax, ay), vec2(bx, by)), WHITE)
    }

    fn portal(ax: f32, ay: f32, bx: f32, by: f32, to: SectorId) -> Wall {
        Wall::portal(Segment::new(vec2(ax, ay), vec2(bx, by)), to)
    }

    /// Square room `id` spanning `x0 .. x0+400`, optional portals on its
    /// west / east sides (wound counter-clockwise).
    fn room(x0: f32, west: Option<SectorId>, east: Option<SectorId>) -> Sector {
        let x1 = x0 + 400.0;
        let side = |ax, ay, bx, by, to: Option<SectorId>| match to {
            Some(to) => portal(ax, ay, bx, by, to),
            None => solid(ax, ay, bx, by),
        };
        Sector::new(vec![
            solid(x0, 0.0, x1, 0.0),
            side(x1, 0.0, x1, 400.0, east),
            solid(x1, 400.0, x0, 400.0),
            side(x0, 400.0, x0, 0.0, west),
        ])
    }

    /// A (1) → B (2), B with a lower ceiling.
    fn step_down_level() -> Level {
        Level::new([
            (1, room(0.0, None, Some(2))),
            (
                2,
                room(400.0, Some(1), None)
                    .with_heights(0.0, 0.6)
                    .with_border_colors(STEP_RED, STEP_RED),
            ),
        ])
        .unwrap()
    }

    /// A (1) → B (2) → C (3) in a straight line.
    fn chain_level() -> Level {
        Level::new([
            (1, room(0.0, None, Some(2))),
            (2, room(400.0, Some(1), Some(3))),
            (3, room(800.0, Some(2), None)),
        ])
        .unwrap()
    }

    fn camera_in(sector: SectorId) -> Camera {
        Camera::new(vec2(200.0, 200.0), 0.0, sector)
    }

    fn is_step_red(c: &Color) -> bool {
        c.r > 0 && c.g == 0 && c.b == 0
    }

    #[test]
    fn portal_into_lower_ceiling_draws_top_step() {
        let level = step_down_level();
        let cam = camera_in(1);
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());

        assert!(r.has_remaining_work());
        r.step_once(&mut out);

        assert_eq!(r.iteration(), 1);
        assert_eq!(
            r.last_discovered(),
            &[RenderArea {
                sector: 2,
                x_begin: 0,
                x_end: W - 1
            }]
        );
        assert_eq!(r.pending(), r.last_discovered());

        let steps: Vec<_> = out
            .columns()
            .filter_map(|c| match c {
                DrawCall::Column {
                    y_top,
                    y_bottom,
                    color,
                    ..
                } if is_step_red(color) => Some(y_bottom - y_top),
                _ => None,
            })
            .collect();
        assert_eq!(steps.len(), W as usize);
        assert!(steps.iter().all(|&h| h > 0.0));

        // open window: below the top step, above the shared floor
        for b in r.column_bounds() {
            assert_eq!(*b, ColumnBound { min: 54, max: 90 });
        }

        r.step_once(&mut out);
        assert!(r.last_discovered().is_empty());
        assert!(r.pending().is_empty());
        assert!(!r.has_remaining_work());
        assert_eq!(r.iteration(), 2);
    }

    #[test]
    fn nothing_is_drawn_outside_the_portal_window() {
        let level = step_down_level();
        let cam = camera_in(1);
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());
        r.step_once(&mut out);
        out.calls.clear();
        r.step_once(&mut out);

        for c in out.columns() {
            if let DrawCall::Column { y_top, y_bottom, .. } = c {
                assert!(*y_top >= 54.0 && *y_bottom <= 90.0);
            }
        }
    }

    #[test]
    fn back_face_portal_is_invisible() {
        // Camera physically in room 1 but rasterized against room 2: the
        // shared wall is a portal seen from its back, so rays go through
        // to room 2's far wall.
        let level = step_down_level();
        let cam = camera_in(2);
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());

        let centre = r.nearest_wall(level.at(2), W / 2).map(|(w, h)| (*w, h));
        let (wall, hit) = centre.unwrap();
        assert!(!wall.is_portal());
        assert!((hit.distance - 600.0).abs() < 1.0);

        r.step_once(&mut out);
        assert!(r.last_discovered().is_empty());
        assert!(!r.has_remaining_work());
        assert!(out.columns().count() > 0);
    }

    #[test]
    fn budget_stops_the_chain() {
        let level = chain_level();
        let mut cam = camera_in(1);
        cam.max_iterations = 1;
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());

        r.step_once(&mut out);
        // only room 1 was rasterized; room 2 waits but the budget is spent
        assert_eq!(r.pending().len(), 1);
        assert_eq!(r.pending()[0].sector, 2);
        assert!(!r.has_remaining_work());

        cam.max_iterations = 2;
        r.reset(SCREEN, &level, &cam);
        r.run_to_completion(&mut out);
        assert_eq!(r.iteration(), 2);
        assert_eq!(r.pending()[0].sector, 3);
        assert!(!r.has_remaining_work());

        cam.max_iterations = 25;
        r.reset(SCREEN, &level, &cam);
        r.run_to_completion(&mut out);
        assert_eq!(r.iteration(), 3);
        assert!(r.pending().is_empty());
    }

    #[test]
    fn budget_is_a_hard_ceiling() {
        let level = sample_level().unwrap();
        let mut out = DrawList::default();
        for budget in 1..6 {
            for i in 0..16 {
                let mut cam = sample_camera();
                cam.max_iterations = budget;
                cam.turn(i as f32 * 0.4);
                let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());
                let mut steps = 0;
                while r.has_remaining_work() {
                    r.step_once(&mut out);
                    steps += 1;
                }
                assert!(steps <= budget);
            }
        }
    }

    #[test]
    fn bounds_never_grow() {
        let level = sample_level().unwrap();
        let mut out = DrawList::default();
        for i in 0..16 {
            let mut cam = sample_camera();
            cam.turn(i as f32 * 0.4);
            let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());
            while r.has_remaining_work() {
                let before = r.column_bounds().to_vec();
                r.step_once(&mut out);
                for (old, new) in before.iter().zip(r.column_bounds()) {
                    assert!(old.contains(new), "{old:?} -> {new:?}");
                    assert!(new.min <= new.max);
                }
            }
        }
    }

    #[test]
    fn one_area_per_destination() {
        let level = sample_level().unwrap();
        let mut out = DrawList::default();
        for i in 0..16 {
            let mut cam = sample_camera();
            cam.turn(i as f32 * 0.4);
            let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());
            while r.has_remaining_work() {
                r.step_once(&mut out);
                let found = r.last_discovered();
                for (i, a) in found.iter().enumerate() {
                    assert!(a.x_begin <= a.x_end);
                    assert!(found[i + 1..].iter().all(|b| b.sector != a.sector));
                }
            }
        }
    }

    const GREEN: Color = Color::rgb(0, 255, 0);

    /// Room 1's east side is portal / solid pillar / portal, both portals
    /// opening into the green room 2.
    fn split_portal_level() -> Level {
        let east = |x0: f32, to: SectorId| {
            [
                portal(x0, 0.0, x0, 150.0, to),
                solid(x0, 150.0, x0, 250.0),
                portal(x0, 250.0, x0, 400.0, to),
            ]
        };
        let mut near = vec![solid(0.0, 0.0, 400.0, 0.0)];
        near.extend(east(400.0, 2));
        near.extend([solid(400.0, 400.0, 0.0, 400.0), solid(0.0, 400.0, 0.0, 0.0)]);

        let green = |ax, ay, bx, by| Wall::solid(Segment::new(vec2(ax, ay), vec2(bx, by)), GREEN);
        let mut far = vec![
            green(400.0, 0.0, 800.0, 0.0),
            green(800.0, 0.0, 800.0, 400.0),
            green(800.0, 400.0, 400.0, 400.0),
        ];
        // shared side, wound the other way
        far.extend(east(400.0, 1).map(|w| Wall {
            segment: Segment::new(w.segment.b, w.segment.a),
            color: GREEN,
            ..w
        }));

        Level::new([(1, Sector::new(near)), (2, Sector::new(far))]).unwrap()
    }

    fn is_green(c: &Color) -> bool {
        c.r == 0 && c.g > 0 && c.b == 0
    }

    #[test]
    fn split_portals_share_one_area() {
        let level = split_portal_level();
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &camera_in(1), RasterOptions::default());
        r.step_once(&mut out);

        // columns 0..=17 and 47..=63 see room 2, 18..=46 see the pillar
        assert_eq!(
            r.last_discovered(),
            &[RenderArea {
                sector: 2,
                x_begin: 0,
                x_end: W - 1
            }]
        );
        assert!(r.column_bounds()[32].is_closed());
        assert!(!r.column_bounds()[0].is_closed());
        assert!(!r.column_bounds()[W as usize - 1].is_closed());
    }

    #[test]
    fn solid_column_stays_closed_under_a_later_area() {
        let level = split_portal_level();
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &camera_in(1), RasterOptions::default());
        r.step_once(&mut out);
        out.calls.clear();

        r.run_to_completion(&mut out);
        assert_eq!(r.iteration(), 2);

        let drawn: Vec<u32> = out
            .columns()
            .filter_map(|c| match c {
                DrawCall::Column { x, color, .. } if is_green(color) => Some(*x),
                _ => None,
            })
            .collect();
        assert!(drawn.contains(&0) && drawn.contains(&(W - 1)));
        assert!(drawn.iter().all(|x| !(18..=46).contains(x)), "{drawn:?}");
        assert_eq!(out.columns().count(), drawn.len());
    }

    #[test]
    fn equidistant_walls_keep_the_first_one() {
        let first = Color::rgb(10, 200, 10);
        let second = Color::rgb(200, 10, 10);
        let wall = |color| Wall::solid(Segment::new(vec2(400.0, 0.0), vec2(400.0, 400.0)), color);
        let level = Level::new([(
            1,
            Sector::new(vec![
                solid(0.0, 0.0, 400.0, 0.0),
                wall(first),
                wall(second),
                solid(400.0, 400.0, 0.0, 400.0),
                solid(0.0, 400.0, 0.0, 0.0),
            ]),
        )])
        .unwrap();

        let walls = &level.at(1).walls;
        let index = |c: Color| walls.iter().position(|w| w.color == c).unwrap();
        assert!(index(first) < index(second));

        let r = Rasterizer::new(SCREEN, &level, &camera_in(1), RasterOptions::default());
        let (hit_wall, _) = r.nearest_wall(level.at(1), W / 2).unwrap();
        assert_eq!(hit_wall.color, first);

        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &camera_in(1), RasterOptions::default());
        r.run_to_completion(&mut out);
        let centre = out
            .columns()
            .find(|c| matches!(c, DrawCall::Column { x, .. } if *x == W / 2));
        match centre {
            Some(DrawCall::Column { color, .. }) => {
                assert!(color.g > color.r, "{color:?}")
            }
            other => panic!("centre column not drawn: {other:?}"),
        }
    }

    #[test]
    fn placeholder_and_markers_follow_options() {
        let level = step_down_level();
        let cam = camera_in(1);
        let placeholder = Color::rgb(0, 0, 255);

        let mut out = DrawList::default();
        let opts = RasterOptions {
            edge_markers: false,
            portal_placeholder: Some(placeholder),
            ..Default::default()
        };
        let mut r = Rasterizer::new(SCREEN, &level, &cam, opts);
        r.step_once(&mut out);
        assert!(!out.calls.iter().any(|c| matches!(c, DrawCall::Rect { .. })));
        let filled = out
            .columns()
            .filter(|c| matches!(c, DrawCall::Column { color, .. } if *color == placeholder))
            .count();
        assert_eq!(filled, W as usize);

        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());
        r.step_once(&mut out);
        assert!(out.calls.iter().any(|c| matches!(c, DrawCall::Rect { w: 3, h: 3, .. })));
    }

    #[test]
    fn sample_level_renders_into_software() {
        let level = sample_level().unwrap();
        let cam = sample_camera();
        let mut sw = Software::default();
        sw.begin_frame(W as usize, H as usize);
        let clear = sw.pixels()[0];

        let mut r = Rasterizer::new(SCREEN, &level, &cam, RasterOptions::default());
        r.run_to_completion(&mut sw);
        assert!(r.iteration() >= 2);
        assert!(sw.pixels().iter().any(|&p| p != clear));
    }

    #[test]
    fn zero_width_screen_has_no_work() {
        let level = step_down_level();
        let r = Rasterizer::new(Screen::new(0, 10), &level, &camera_in(1), RasterOptions::default());
        assert!(!r.has_remaining_work());
    }

    #[test]
    #[should_panic(expected = "unknown sector")]
    fn reset_rejects_unknown_sector() {
        let level = step_down_level();
        let _ = Rasterizer::new(SCREEN, &level, &camera_in(9), RasterOptions::default());
    }

    #[test]
    #[should_panic(expected = "no remaining work")]
    fn stepping_a_drained_pass_panics() {
        let level = step_down_level();
        let mut out = DrawList::default();
        let mut r = Rasterizer::new(SCREEN, &level, &camera_in(1), RasterOptions::default());
        r.run_to_completion(&mut out);
        r.step_once(&mut out);
    }
}
