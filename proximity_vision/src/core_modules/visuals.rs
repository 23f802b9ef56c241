// THEORY:
// `Visuals` is the HUD painter. It turns the current proximity state and a timestamp
// into display-list primitives. Everything animated is a pure function of the time
// elapsed since the painter was created, so a test can pin the clock and get the
// exact same frame every time.
//
// Animated elements:
// - The energy core pulses: its radius oscillates as sin(t * speed) * magnitude,
//   and both speed and magnitude climb with the alert level.
// - In DANGER, a full-frame red border and a warning banner blink at 5 Hz
//   (on for 100 ms, off for 100 ms).

use crate::core_modules::contour::{Contour, Point};
use crate::core_modules::overlay::{Fill, Overlay, Primitive, Rgb, TextAlign};
use crate::core_modules::proximity::ProximityState;
use std::time::Instant;

const CORNER_INSET: i32 = 10;
const CORNER_LENGTH: i32 = 40;
const CORNER_THICKNESS: i32 = 4;
const STATUS_BOX_HALF_WIDTH: i32 = 100;
const STATUS_BOX_TOP: i32 = 20;
const STATUS_BOX_BOTTOM: i32 = 70;
const STATUS_TEXT_BASELINE: i32 = 55;

/// Pulse parameters for one alert level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseStyle {
    pub color: Rgb,
    /// Angular speed of the pulse, radians per second.
    pub speed: f64,
    /// Peak radius deviation in pixels.
    pub magnitude: f64,
}

impl PulseStyle {
    pub fn for_state(state: ProximityState) -> Self {
        match state {
            ProximityState::Safe => Self {
                color: Rgb::BLUE,
                speed: 2.0,
                magnitude: 5.0,
            },
            ProximityState::Warning => Self {
                color: Rgb::YELLOW,
                speed: 5.0,
                magnitude: 10.0,
            },
            ProximityState::Danger => Self {
                color: Rgb::RED,
                speed: 10.0,
                magnitude: 15.0,
            },
        }
    }
}

/// The HUD accent color for a state.
pub fn state_color(state: ProximityState) -> Rgb {
    match state {
        ProximityState::Safe => Rgb::GREEN,
        ProximityState::Warning => Rgb::YELLOW,
        ProximityState::Danger => Rgb::RED,
    }
}

/// Stateful HUD painter. Holds the animation epoch and the current pulse speed.
#[derive(Debug, Clone)]
pub struct Visuals {
    start: Instant,
    pulse_speed: f64,
}

impl Visuals {
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            pulse_speed: PulseStyle::for_state(ProximityState::Safe).speed,
        }
    }

    pub fn pulse_speed(&self) -> f64 {
        self.pulse_speed
    }

    fn elapsed_secs(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64()
    }

    /// True during the "on" half of the DANGER blink.
    pub fn flash_on(&self, now: Instant) -> bool {
        ((self.elapsed_secs(now) * 10.0) as u64) % 2 == 0
    }

    /// Radius of the outer core ring at `now`.
    pub fn pulse_radius(&self, base_radius: i32, style: &PulseStyle, now: Instant) -> i32 {
        let pulse = (self.elapsed_secs(now) * style.speed).sin() * style.magnitude;
        (base_radius as f64 + pulse) as i32
    }

    /// Draws the pulsing virtual object.
    pub fn energy_core(
        &mut self,
        overlay: &mut Overlay,
        center: Point,
        base_radius: i32,
        state: ProximityState,
        now: Instant,
    ) {
        let style = PulseStyle::for_state(state);
        self.pulse_speed = style.speed;
        let radius = self.pulse_radius(base_radius, &style, now);

        overlay.circle(center, radius, style.color, Fill::Outline(2));
        overlay.circle(center, radius + 10, style.color, Fill::Outline(1));
        overlay.circle(center, (base_radius as f64 * 0.5) as i32, style.color, Fill::Solid);
        overlay.text(
            "CORE",
            center.offset(-25, 5),
            TextAlign::Left,
            0.5,
            Rgb::WHITE,
            1,
        );
    }

    /// Draws the frame chrome: corner brackets, status banner, FPS and danger flash.
    pub fn hud(
        &self,
        overlay: &mut Overlay,
        width: i32,
        height: i32,
        state: ProximityState,
        fps: f64,
        now: Instant,
    ) {
        let color = state_color(state);
        overlay.extend(corner_brackets(width, height, color));

        let half = width / 2;
        let top_left = Point::new(half - STATUS_BOX_HALF_WIDTH, STATUS_BOX_TOP);
        let bottom_right = Point::new(half + STATUS_BOX_HALF_WIDTH, STATUS_BOX_BOTTOM);
        overlay.rectangle(top_left, bottom_right, Rgb::BLACK, Fill::Solid);
        overlay.rectangle(top_left, bottom_right, color, Fill::Outline(2));
        overlay.text(
            state.label(),
            Point::new(0, STATUS_TEXT_BASELINE),
            TextAlign::Center { width },
            1.0,
            color,
            2,
        );

        overlay.text(
            format!("FPS: {}", fps as i64),
            Point::new(20, 40),
            TextAlign::Left,
            0.7,
            Rgb::GREEN,
            1,
        );

        if state == ProximityState::Danger && self.flash_on(now) {
            overlay.rectangle(
                Point::new(0, 0),
                Point::new(width, height),
                Rgb::RED,
                Fill::Outline(10),
            );
            overlay.text(
                "CRITICAL PROXIMITY",
                Point::new(half - 200, height - 100),
                TextAlign::Left,
                1.5,
                Rgb::RED,
                3,
            );
        }
    }

    /// Outlines the tracked hand and tags its smoothed centre.
    pub fn target_marker(&self, overlay: &mut Overlay, contour: &Contour, center: Point) {
        overlay.push(Primitive::Polyline {
            points: contour.points.clone(),
            closed: true,
            color: Rgb::GREEN,
            thickness: 2,
        });
        overlay.line(center, center.offset(20, -20), Rgb::GREEN, 2);
        overlay.text(
            "TARGET",
            center.offset(25, -25),
            TextAlign::Left,
            0.5,
            Rgb::GREEN,
            1,
        );
    }
}

/// Eight strokes, two per corner, each running inward from an inset corner point.
fn corner_brackets(width: i32, height: i32, color: Rgb) -> Vec<Primitive> {
    let left = CORNER_INSET;
    let right = width - CORNER_INSET;
    let top = CORNER_INSET;
    let bottom = height - CORNER_INSET;

    // (corner, horizontal direction, vertical direction)
    let corners = [
        (Point::new(left, top), 1, 1),
        (Point::new(right, top), -1, 1),
        (Point::new(left, bottom), 1, -1),
        (Point::new(right, bottom), -1, -1),
    ];

    corners
        .into_iter()
        .flat_map(|(corner, sx, sy)| {
            [
                Primitive::Line {
                    from: corner,
                    to: corner.offset(sx * CORNER_LENGTH, 0),
                    color,
                    thickness: CORNER_THICKNESS,
                },
                Primitive::Line {
                    from: corner,
                    to: corner.offset(0, sy * CORNER_LENGTH),
                    color,
                    thickness: CORNER_THICKNESS,
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn circles(overlay: &Overlay) -> Vec<(i32, Fill, Rgb)> {
        overlay
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle {
                    radius, fill, color, ..
                } => Some((*radius, *fill, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn core_at_epoch_has_base_radius() {
        let start = Instant::now();
        let mut visuals = Visuals::new(start);
        let mut overlay = Overlay::new();
        visuals.energy_core(&mut overlay, Point::new(320, 240), 60, ProximityState::Safe, start);

        assert_eq!(
            circles(&overlay),
            vec![
                (60, Fill::Outline(2), Rgb::BLUE),
                (70, Fill::Outline(1), Rgb::BLUE),
                (30, Fill::Solid, Rgb::BLUE),
            ]
        );
        assert_eq!(overlay.texts(), vec!["CORE"]);
        assert_eq!(visuals.pulse_speed(), 2.0);
    }

    #[test]
    fn core_pulse_follows_state() {
        let start = Instant::now();
        let mut visuals = Visuals::new(start);
        // sin(0.5 * 10) * 15 = -14.38..., truncated toward zero.
        let now = start + Duration::from_millis(500);
        let mut overlay = Overlay::new();
        visuals.energy_core(&mut overlay, Point::new(0, 0), 60, ProximityState::Danger, now);

        assert_eq!(circles(&overlay)[0], (45, Fill::Outline(2), Rgb::RED));
        assert_eq!(visuals.pulse_speed(), 10.0);

        let mut overlay = Overlay::new();
        visuals.energy_core(&mut overlay, Point::new(0, 0), 60, ProximityState::Warning, now);
        // sin(2.5) * 10 = 5.98...
        assert_eq!(circles(&overlay)[0], (65, Fill::Outline(2), Rgb::YELLOW));
        assert_eq!(visuals.pulse_speed(), 5.0);
    }

    #[test]
    fn hud_shows_state_and_fps() {
        let start = Instant::now();
        let visuals = Visuals::new(start);
        let mut overlay = Overlay::new();
        visuals.hud(&mut overlay, 640, 480, ProximityState::Warning, 29.97, start);

        assert_eq!(overlay.texts(), vec!["WARNING", "FPS: 29"]);
        let lines = overlay
            .iter()
            .filter(|p| matches!(p, Primitive::Line { color, thickness: 4, .. } if *color == Rgb::YELLOW))
            .count();
        assert_eq!(lines, 8);
        assert!(overlay.iter().any(|p| *p
            == Primitive::Rectangle {
                top_left: Point::new(220, 20),
                bottom_right: Point::new(420, 70),
                color: Rgb::BLACK,
                fill: Fill::Solid,
            }));
        assert!(overlay.iter().any(|p| matches!(
            p,
            Primitive::Text { text, origin, align: TextAlign::Center { width: 640 }, .. }
                if text == "WARNING" && *origin == Point::new(0, 55)
        )));
    }

    #[test]
    fn corner_brackets_point_inward() {
        let lines = corner_brackets(200, 100, Rgb::GREEN);
        assert_eq!(lines.len(), 8);
        assert_eq!(
            lines[2],
            Primitive::Line {
                from: Point::new(190, 10),
                to: Point::new(150, 10),
                color: Rgb::GREEN,
                thickness: 4,
            }
        );
        assert_eq!(
            lines[7],
            Primitive::Line {
                from: Point::new(190, 90),
                to: Point::new(190, 50),
                color: Rgb::GREEN,
                thickness: 4,
            }
        );
    }

    #[test]
    fn danger_banner_blinks() {
        let start = Instant::now();
        let visuals = Visuals::new(start);

        let mut on = Overlay::new();
        visuals.hud(&mut on, 640, 480, ProximityState::Danger, 30.0, start + Duration::from_millis(50));
        assert!(on.texts().contains(&"CRITICAL PROXIMITY"));

        let mut off = Overlay::new();
        visuals.hud(&mut off, 640, 480, ProximityState::Danger, 30.0, start + Duration::from_millis(150));
        assert!(!off.texts().contains(&"CRITICAL PROXIMITY"));
        assert_eq!(on.len(), off.len() + 2);
    }

    #[test]
    fn no_banner_outside_danger() {
        let start = Instant::now();
        let visuals = Visuals::new(start);
        let mut overlay = Overlay::new();
        visuals.hud(&mut overlay, 640, 480, ProximityState::Safe, 0.0, start);
        assert_eq!(overlay.texts(), vec!["SAFE", "FPS: 0"]);
    }

    #[test]
    fn target_marker_tags_centre() {
        let visuals = Visuals::new(Instant::now());
        let contour = Contour::new(vec![Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)]);
        let mut overlay = Overlay::new();
        visuals.target_marker(&mut overlay, &contour, Point::new(100, 100));

        assert_eq!(overlay.len(), 3);
        assert!(overlay.iter().any(|p| *p
            == Primitive::Line {
                from: Point::new(100, 100),
                to: Point::new(120, 80),
                color: Rgb::GREEN,
                thickness: 2,
            }));
        assert_eq!(overlay.texts(), vec!["TARGET"]);
    }
}
