//! Which views are on screen at a given run time, and where.
//!
//! Views join one at a time, `time_between_games` apart. Each one starts sliding in
//! `animation_duration` before its start time, moving from the incoming slot of the current layout
//! to its place in the next one while every other view shuffles over to make room.

use std::time::Duration;

use engine::camera::{Camera, DEFAULT_NEAR};
use engine::layout::{ViewportLayoutTable, ViewportRect};
use engine::scene::Rgb;
use engine::surface::SurfaceSize;
use glam::Vec3;

use crate::config::ShowcaseConfig;
use crate::error::ConfigError;
use crate::games::{GameDescriptor, GameKind};

/// A configured game placed in time and space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewEntry {
    pub index: usize,
    pub descriptor: GameDescriptor,
    pub start_time: Duration,
    /// World-space center of this view's scene.
    pub displacement: Vec3,
}

impl ViewEntry {
    pub fn new(index: usize, descriptor: GameDescriptor, config: &ShowcaseConfig) -> Self {
        let d = index as f32 * 3.0 * config.far_plane_distance;
        Self {
            index,
            descriptor,
            start_time: config.time_between_games.saturating_mul(index as u32),
            displacement: Vec3::splat(d),
        }
    }

    pub fn kind(&self) -> GameKind {
        self.descriptor.kind
    }
}

/// Views on screen at one instant. `visible` is always a prefix of `including_entering`, and the
/// two differ by at most the one view that is sliding in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPartition<'a> {
    pub visible: &'a [ViewEntry],
    pub including_entering: &'a [ViewEntry],
}

impl ViewPartition<'_> {
    pub fn is_transitioning(&self) -> bool {
        self.including_entering.len() > self.visible.len()
    }
}

/// Everything the renderer needs for one view this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub index: usize,
    pub kind: GameKind,
    pub rect: ViewportRect,
    pub camera: Camera,
    pub background: Rgb,
    pub displacement: Vec3,
}

#[derive(Debug, Clone)]
pub struct ViewSchedule {
    entries: Vec<ViewEntry>,
    animation: Duration,
    fov_y_degrees: f32,
    far: f32,
    table: ViewportLayoutTable,
}

impl ViewSchedule {
    pub fn new(
        descriptors: Vec<GameDescriptor>,
        config: &ShowcaseConfig,
        screen: SurfaceSize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if descriptors.is_empty() {
            return Err(ConfigError::EmptyGameList);
        }
        for (i, descriptor) in descriptors.iter().enumerate() {
            if descriptors[..i].iter().any(|d| d.kind == descriptor.kind) {
                return Err(ConfigError::DuplicateGame(descriptor.kind));
            }
        }

        let entries: Vec<ViewEntry> = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| ViewEntry::new(index, descriptor, config))
            .collect();
        let table = ViewportLayoutTable::new(entries.len(), screen);

        Ok(Self {
            entries,
            animation: config.animation_duration,
            fov_y_degrees: config.fov_y_degrees,
            far: config.far_plane_distance,
            table,
        })
    }

    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn animation(&self) -> Duration {
        self.animation
    }

    pub fn table(&self) -> &ViewportLayoutTable {
        &self.table
    }

    pub fn screen(&self) -> SurfaceSize {
        self.table.screen()
    }

    pub fn resize(&mut self, screen: SurfaceSize) {
        self.table.resize(screen);
    }

    pub fn partition(&self, elapsed: Duration) -> ViewPartition<'_> {
        let visible = self.entries.partition_point(|e| e.start_time <= elapsed);
        let entering = self
            .entries
            .partition_point(|e| e.start_time.saturating_sub(self.animation) <= elapsed);
        ViewPartition {
            visible: &self.entries[..visible],
            including_entering: &self.entries[..entering],
        }
    }

    /// Progress of the newest view's slide-in, in `[0, 1]`.
    pub fn alpha(&self, elapsed: Duration, partition: &ViewPartition<'_>) -> f32 {
        let Some(last) = partition.including_entering.last() else {
            return 1.0;
        };
        let animation = self.animation.as_secs_f64();
        let slide_start = last.start_time.as_secs_f64() - animation;
        let alpha = (elapsed.as_secs_f64() - slide_start) / animation;
        alpha.clamp(0.0, 1.0) as f32
    }

    /// Rect, camera and background for every view on screen at `elapsed`, in view order.
    pub fn frame_views(&self, elapsed: Duration) -> Vec<FrameView> {
        let partition = self.partition(elapsed);
        let alpha = self.alpha(elapsed, &partition);
        let from = self.layout(partition.visible.len());
        let to = self.layout(partition.including_entering.len());

        partition
            .including_entering
            .iter()
            .enumerate()
            .map(|(slot, entry)| {
                let rect = from[slot].lerp(to[slot], alpha);
                let camera = Camera::orbiting(entry.displacement, entry.descriptor.camera_offset, rect.aspect())
                    .with_lens(self.fov_y_degrees, DEFAULT_NEAR, self.far);
                FrameView {
                    index: entry.index,
                    kind: entry.kind(),
                    rect,
                    camera,
                    background: entry.descriptor.background,
                    displacement: entry.displacement,
                }
            })
            .collect()
    }

    fn layout(&self, active: usize) -> &[ViewportRect] {
        // The table is built for every count up to the number of entries.
        self.table
            .entry(active)
            .unwrap_or_else(|| panic!("no layout for {active} views (table holds {})", self.table.max_views()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::default_lineup;

    const SCREEN: SurfaceSize = SurfaceSize::new(1024, 768);

    fn schedule() -> ViewSchedule {
        ViewSchedule::new(default_lineup(), &ShowcaseConfig::default(), SCREEN).expect("valid schedule")
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn entries_are_spaced_in_time_and_space() {
        let schedule = schedule();
        let starts: Vec<_> = schedule.entries().iter().map(|e| e.start_time).collect();
        assert_eq!(starts, vec![ms(0), ms(10_000), ms(20_000), ms(30_000)]);
        assert_eq!(schedule.entries()[0].displacement, Vec3::ZERO);
        assert_eq!(schedule.entries()[2].displacement, Vec3::splat(600.0));
        assert_eq!(schedule.table().max_views(), 4);
    }

    #[test]
    fn configuration_errors_fail_fast() {
        let config = ShowcaseConfig::default();
        assert!(matches!(
            ViewSchedule::new(Vec::new(), &config, SCREEN),
            Err(ConfigError::EmptyGameList)
        ));

        let mut doubled = default_lineup();
        doubled.push(doubled[0]);
        assert!(matches!(
            ViewSchedule::new(doubled, &config, SCREEN),
            Err(ConfigError::DuplicateGame(GameKind::Jump))
        ));

        let no_animation = ShowcaseConfig {
            animation_duration: Duration::ZERO,
            ..config
        };
        assert!(matches!(
            ViewSchedule::new(default_lineup(), &no_animation, SCREEN),
            Err(ConfigError::ZeroAnimationDuration)
        ));
    }

    #[test]
    fn partition_tracks_visible_and_entering_views() {
        let schedule = schedule();

        let p = schedule.partition(ms(0));
        assert_eq!((p.visible.len(), p.including_entering.len()), (1, 1));

        let p = schedule.partition(ms(7_999));
        assert_eq!((p.visible.len(), p.including_entering.len()), (1, 1));

        let p = schedule.partition(ms(8_000));
        assert_eq!((p.visible.len(), p.including_entering.len()), (1, 2));
        assert!(p.is_transitioning());

        let p = schedule.partition(ms(10_000));
        assert_eq!((p.visible.len(), p.including_entering.len()), (2, 2));

        let p = schedule.partition(ms(120_000));
        assert_eq!((p.visible.len(), p.including_entering.len()), (4, 4));
    }

    #[test]
    fn alpha_ramps_over_the_animation_window() {
        let schedule = schedule();
        let at = |t| {
            let p = schedule.partition(ms(t));
            schedule.alpha(ms(t), &p)
        };
        assert_eq!(at(0), 1.0);
        assert_eq!(at(8_000), 0.0);
        assert!((at(9_000) - 0.5).abs() < 1e-6);
        assert_eq!(at(10_000), 1.0);
        assert_eq!(at(15_000), 1.0);
    }

    #[test]
    fn frame_views_interpolate_between_layouts() {
        let schedule = schedule();
        let table = schedule.table();

        let start = schedule.frame_views(ms(8_000));
        assert_eq!(start.len(), 2);
        assert_eq!(start[0].rect, table.entry(1).unwrap()[0]);
        assert_eq!(start[1].rect, table.entry(1).unwrap()[1]);

        let mid = schedule.frame_views(ms(9_000));
        assert_eq!(mid[0].rect, ViewportRect::new(0.0, 0.0, 1024.0, 576.0));
        assert_eq!(mid[1].rect, ViewportRect::new(0.0, 576.0, 1024.0, 576.0));

        let done = schedule.frame_views(ms(10_000));
        assert_eq!(done[0].rect, table.entry(2).unwrap()[0]);
        assert_eq!(done[1].rect, table.entry(2).unwrap()[1]);
    }

    #[test]
    fn cameras_orbit_each_views_displacement() {
        let schedule = schedule();
        let views = schedule.frame_views(ms(25_000));
        assert_eq!(views.len(), 3);
        let collect = views[2];
        assert_eq!(collect.kind, GameKind::Collect);
        assert_eq!(collect.camera.target, Vec3::splat(600.0));
        assert_eq!(collect.camera.position, Vec3::new(600.0, 625.0, 600.0));
        assert_eq!(collect.camera.far, 100.0);
        assert_eq!(collect.camera.fov_y_degrees, 50.0);
        assert!((collect.camera.aspect - collect.rect.width / collect.rect.height).abs() < 1e-6);
        assert_eq!(collect.background, [0xff, 0xff, 0xb8]);
    }

    #[test]
    fn resize_rebuilds_the_layouts() {
        let mut schedule = schedule();
        schedule.resize(SurfaceSize::new(800, 600));
        let views = schedule.frame_views(ms(0));
        assert_eq!(views[0].rect, ViewportRect::new(0.0, 0.0, 800.0, 600.0));
    }
}
