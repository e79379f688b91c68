//! Running print statistics derived from the command stream

use crate::constants::{DEFAULT_HOME, EXTRUDER_COUNT};
use crate::diagnostics::{Diagnostics, BAD_COORDINATE, BAD_DURATION, BAD_FEEDRATE};
use crate::types::{Move, Position};
use serde::{Deserialize, Serialize};

/// Accumulated statistics of an encoding session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of Euclidean move lengths (mm)
    pub distance_traveled: f64,
    /// Estimated print time (s)
    pub time_cost: f64,
    /// Largest X reached (mm)
    pub max_x: f64,
    /// Largest Y reached (mm)
    pub max_y: f64,
    /// Largest Z reached (mm)
    pub max_z: f64,
    /// Largest distance from the Z axis (mm)
    pub max_radius: f64,
    /// Final extruder positions (mm of filament)
    pub filament_used: [f64; EXTRUDER_COUNT],
}

/// Tracks toolhead state and folds every command into [`Statistics`]
///
/// Updates happen before the command is encoded and never alter the values
/// the encoder writes.
#[derive(Debug, Clone)]
pub struct StatsTracker {
    position: Position,
    home: Position,
    feedrate: f32,
    filament: [f32; EXTRUDER_COUNT],
    stats: Statistics,
}

impl Default for StatsTracker {
    fn default() -> Self {
        let (x, y, z) = DEFAULT_HOME;
        Self::new(Position::new(x, y, z))
    }
}

impl StatsTracker {
    /// Tracker starting at the origin with the given home position
    pub fn new(home: Position) -> Self {
        Self {
            position: Position::default(),
            home,
            feedrate: 0.0,
            filament: [0.0; EXTRUDER_COUNT],
            stats: Statistics::default(),
        }
    }

    /// Statistics so far
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Last known toolhead position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Last positive feedrate seen, or 0 if none yet
    pub fn feedrate(&self) -> f32 {
        self.feedrate
    }

    /// Current extruder positions
    pub fn filament(&self) -> [f32; EXTRUDER_COUNT] {
        self.filament
    }

    /// Fold a move into the statistics
    ///
    /// A move carrying any non-finite flagged value is reported and left out
    /// of the statistics entirely; the tracked state stays as it was.
    pub fn record_move(&mut self, mv: &Move, diag: &mut Diagnostics) {
        let flags = mv.flags;

        if let Some(problem) = non_finite_field(mv) {
            diag.report(false, problem);
            return;
        }

        if flags.has_feedrate() && mv.feedrate > 0.0 {
            self.feedrate = mv.feedrate;
        }

        let mut delta = [0.0f64; 3];
        if flags.has_x() {
            delta[0] = track_axis(&mut self.position.x, &mut self.stats.max_x, mv.x);
        }
        if flags.has_y() {
            delta[1] = track_axis(&mut self.position.y, &mut self.stats.max_y, mv.y);
        }
        if flags.has_x() || flags.has_y() {
            let r = f64::from(self.position.x).hypot(f64::from(self.position.y));
            self.stats.max_radius = self.stats.max_radius.max(r);
        }
        if flags.has_z() {
            delta[2] = track_axis(&mut self.position.z, &mut self.stats.max_z, mv.z);
        }

        let mut extruded = [0.0f64; EXTRUDER_COUNT];
        for (i, slot) in extruded.iter_mut().enumerate() {
            if flags.has_extruder(i) {
                *slot = f64::from(mv.e[i]) - f64::from(self.filament[i]);
                self.filament[i] = mv.e[i];
                self.stats.filament_used[i] = f64::from(mv.e[i]);
            }
        }

        if flags.is_positional() {
            let dist = (delta[0].powi(2) + delta[1].powi(2) + delta[2].powi(2)).sqrt();
            self.stats.distance_traveled += dist;

            if self.feedrate > 0.0 {
                self.stats.time_cost += dist / f64::from(self.feedrate) * 60.0;
            } else {
                diag.report(false, BAD_FEEDRATE);
            }
        } else if flags.is_extrusion_only() {
            // Extrusion-only timing reads the feedrate argument, not the stored one.
            let peak = extruded[0].max(extruded[1]).max(extruded[2]);
            let tc = peak / f64::from(mv.feedrate) * 60.0;
            if mv.feedrate > 0.0 && tc.is_finite() {
                self.stats.time_cost += tc.max(0.0);
            } else {
                diag.report(false, BAD_FEEDRATE);
            }
        }
    }

    /// Fold a dwell into the time estimate
    pub fn record_sleep(&mut self, seconds: f32, diag: &mut Diagnostics) {
        if seconds.is_finite() && seconds >= 0.0 {
            self.stats.time_cost += f64::from(seconds);
        } else {
            diag.report(false, BAD_DURATION);
        }
    }

    /// Snap the tracked position to home
    pub fn record_home(&mut self) {
        self.position = self.home;
    }
}

/// First non-finite value the move would feed into the statistics, as a diagnostic tag
fn non_finite_field(mv: &Move) -> Option<&'static str> {
    let flags = mv.flags;
    let reads_feedrate = flags.has_feedrate() || flags.is_extrusion_only();
    if reads_feedrate && !mv.feedrate.is_finite() {
        return Some(BAD_FEEDRATE);
    }

    let coords = [
        (flags.has_x(), mv.x),
        (flags.has_y(), mv.y),
        (flags.has_z(), mv.z),
        (flags.has_extruder(0), mv.e[0]),
        (flags.has_extruder(1), mv.e[1]),
        (flags.has_extruder(2), mv.e[2]),
    ];
    coords
        .iter()
        .any(|&(present, v)| present && !v.is_finite())
        .then_some(BAD_COORDINATE)
}

/// Move one axis to `target`, returning the delta
fn track_axis(current: &mut f32, max: &mut f64, target: f32) -> f64 {
    let delta = f64::from(target) - f64::from(*current);
    *current = target;
    *max = max.max(f64::from(target));
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MoveFlags;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_positional_move_distance_and_time() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(600.0).x(3.0).y(4.0), &mut d);

        let s = t.statistics();
        assert!(close(s.distance_traveled, 5.0));
        assert!(close(s.time_cost, 0.5));
        assert!(close(s.max_radius, 5.0));
        assert!(d.is_empty());
    }

    #[test]
    fn test_stored_feedrate_reused() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(60.0).x(1.0), &mut d);
        t.record_move(&Move::new().x(2.0), &mut d);

        assert_eq!(t.feedrate(), 60.0);
        assert!(close(t.statistics().time_cost, 2.0));
    }

    #[test]
    fn test_zero_feedrate_keeps_previous() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(60.0).x(1.0), &mut d);
        t.record_move(&Move::new().feedrate(0.0).x(2.0), &mut d);

        assert_eq!(t.feedrate(), 60.0);
        assert!(d.is_empty());
    }

    #[test]
    fn test_missing_feedrate_warns_once() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(0.0).x(10.0), &mut d);

        assert_eq!(d.entries(), &["WARNING BAD_FEEDRATE".to_string()]);
        assert!(close(t.statistics().distance_traveled, 10.0));
        assert_eq!(t.statistics().time_cost, 0.0);
    }

    #[test]
    fn test_extrusion_only_uses_argument_feedrate() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(6000.0).x(1.0), &mut d);
        let before = t.statistics().time_cost;

        // Flag clear: the stored 6000 mm/min is not consulted
        let mut mv = Move::new().extruder(0, 5.0);
        mv.feedrate = 300.0;
        t.record_move(&mv, &mut d);

        assert!(close(t.statistics().time_cost - before, 1.0));
        assert_eq!(t.feedrate(), 6000.0);
    }

    #[test]
    fn test_extrusion_only_without_feedrate() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().extruder(0, 5.0), &mut d);

        assert!(d.contains("WARNING BAD_FEEDRATE"));
        assert_eq!(t.statistics().time_cost, 0.0);
        assert_eq!(t.statistics().filament_used[0], 5.0);
    }

    #[test]
    fn test_retraction_adds_no_time() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(300.0).extruder(0, 5.0), &mut d);
        let before = t.statistics().time_cost;
        t.record_move(&Move::new().feedrate(300.0).extruder(0, 3.0), &mut d);

        assert_eq!(t.statistics().time_cost, before);
        assert_eq!(t.filament()[0], 3.0);
    }

    #[test]
    fn test_nan_coordinate_is_not_adopted() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(60.0).x(1.0), &mut d);
        let before = *t.statistics();

        t.record_move(&Move::new().x(f32::NAN).y(2.0), &mut d);

        assert_eq!(*t.statistics(), before);
        assert_eq!(t.position(), Position::new(1.0, 0.0, 0.0));
        assert_eq!(d.entries(), &["WARNING BAD_COORDINATE".to_string()]);
    }

    #[test]
    fn test_nan_feedrate_skips_move() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(f32::NAN).x(4.0), &mut d);

        assert_eq!(*t.statistics(), Statistics::default());
        assert_eq!(t.feedrate(), 0.0);
        assert!(d.contains("WARNING BAD_FEEDRATE"));
    }

    #[test]
    fn test_move_without_axes_adds_nothing() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(&Move::new(), &mut d);
        t.record_move(&Move::new().feedrate(0.0), &mut d);
        t.record_move(&Move::from_raw(0, f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), &mut d);

        assert_eq!(*t.statistics(), Statistics::default());
        assert!(d.is_empty());
    }

    #[test]
    fn test_extrusion_only_nan_argument_skips_move() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_move(
            &Move::from_raw(MoveFlags::HAS_E0, f32::NAN, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0),
            &mut d,
        );

        assert_eq!(*t.statistics(), Statistics::default());
        assert_eq!(t.filament(), [0.0; EXTRUDER_COUNT]);
        assert_eq!(d.entries(), &["WARNING BAD_FEEDRATE".to_string()]);
    }

    #[test]
    fn test_home_resets_position() {
        let mut t = StatsTracker::new(Position::new(1.0, 2.0, 3.0));
        let mut d = Diagnostics::new();
        t.record_move(&Move::new().feedrate(60.0).x(50.0).z(9.0), &mut d);
        t.record_home();

        assert_eq!(t.position(), Position::new(1.0, 2.0, 3.0));
        assert_eq!(t.statistics().max_x, 50.0);
    }

    #[test]
    fn test_sleep() {
        let mut t = StatsTracker::default();
        let mut d = Diagnostics::new();
        t.record_sleep(1.5, &mut d);
        t.record_sleep(f32::NAN, &mut d);
        t.record_sleep(-1.0, &mut d);

        assert_eq!(t.statistics().time_cost, 1.5);
        assert_eq!(d.len(), 2);
    }
}
