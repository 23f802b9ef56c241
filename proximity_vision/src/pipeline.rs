// THEORY:
// The `pipeline` module is the top-level API of the proximity engine. It strings the
// core modules together into a single per-frame call:
//
//     RGB frame -> HSV mask -> erode/dilate -> contours -> largest contour
//               -> centroid -> smoothing -> distance -> zone -> display list
//
// The caller owns capture and display. It hands in an already mirrored RGB frame and
// a timestamp, and gets back a `FrameReport` that carries both the analysis (state,
// hand position, distance) and the overlay to paint on top of the frame.

use crate::core_modules::contour::{self, Contour, Point};
use crate::core_modules::frame_clock::FrameClock;
use crate::core_modules::hsv::HsvRange;
use crate::core_modules::mask::{self, MorphologyConfig};
use crate::core_modules::overlay::{Overlay, Rgb};
use crate::core_modules::smoother::{CentroidSmoother, DEFAULT_HISTORY_LENGTH};
use crate::core_modules::visuals::Visuals;
use crate::error::{Result, VisionError};
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::time::Instant;

// Re-export key data structures for the public API.
pub use crate::core_modules::proximity::{ProximityState, ProximityZones};

/// Configuration for the ProximityPipeline. Every field has a working default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// The HSV box that counts as "hand".
    pub hsv_range: HsvRange,
    /// Noise cleanup applied to the raw mask.
    pub morphology: MorphologyConfig,
    /// A contour must enclose strictly more than this many square pixels to be tracked.
    pub min_contour_area: f64,
    /// Number of recent centroids averaged into the reported hand position.
    pub history_length: usize,
    /// Zone geometry around the virtual object.
    pub zones: ProximityZones,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hsv_range: HsvRange::default(),
            morphology: MorphologyConfig::default(),
            min_contour_area: 1000.0,
            history_length: DEFAULT_HISTORY_LENGTH,
            zones: ProximityZones::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.morphology.kernel_size == 0 {
            return Err(VisionError::InvalidConfig(
                "morphology.kernel_size must be at least 1".into(),
            ));
        }
        if self.history_length == 0 {
            return Err(VisionError::InvalidConfig(
                "history_length must be at least 1".into(),
            ));
        }
        if !self.min_contour_area.is_finite() || self.min_contour_area < 0.0 {
            return Err(VisionError::InvalidConfig(format!(
                "min_contour_area must be a non-negative number, got {}",
                self.min_contour_area
            )));
        }
        if self.zones.object_radius < 0 {
            return Err(VisionError::InvalidConfig(format!(
                "zones.object_radius must not be negative, got {}",
                self.zones.object_radius
            )));
        }
        Ok(())
    }
}

/// Everything known about the tracked hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    /// Outer border of the largest in-range region.
    pub contour: Contour,
    pub area: f64,
    /// This frame's centroid, before smoothing.
    pub raw_centroid: Point,
    /// The smoothed position used for the proximity decision.
    pub center: Point,
    /// Distance from `center` to the virtual object, in pixels.
    pub distance: f64,
}

/// The output of the pipeline for a single frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub state: ProximityState,
    /// Centre of the virtual object (the frame centre).
    pub object_center: Point,
    /// `None` when no region passed the area filter.
    pub hand: Option<HandDetection>,
    pub fps: f64,
    /// The cleaned binary mask the contours were traced on.
    pub mask: GrayImage,
    /// Drawing commands for the HUD, in paint order.
    pub overlay: Overlay,
}

/// The main, top-level struct for the proximity engine.
pub struct ProximityPipeline {
    config: PipelineConfig,
    smoother: CentroidSmoother,
    visuals: Visuals,
    clock: FrameClock,
    last_state: ProximityState,
}

impl ProximityPipeline {
    /// Builds a pipeline whose animations are timed from `Instant::now()`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_start(config, Instant::now())
    }

    /// Builds a pipeline whose animations are timed from `start`.
    pub fn with_start(mut config: PipelineConfig, start: Instant) -> Result<Self> {
        config.validate()?;
        config.hsv_range = config.hsv_range.clamped();
        Ok(Self {
            smoother: CentroidSmoother::new(config.history_length),
            visuals: Visuals::new(start),
            clock: FrameClock::new(),
            last_state: ProximityState::Safe,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn hsv_range(&self) -> HsvRange {
        self.config.hsv_range
    }

    /// Replaces the color thresholds. Takes effect on the next frame.
    pub fn set_hsv_range(&mut self, range: HsvRange) {
        let range = range.clamped();
        if range != self.config.hsv_range {
            log::debug!("hsv range changed to {range:?}");
            self.config.hsv_range = range;
        }
    }

    /// Forgets all smoothed positions.
    pub fn reset_tracking(&mut self) {
        self.smoother.clear();
        log::info!("tracking history cleared");
    }

    pub fn last_state(&self) -> ProximityState {
        self.last_state
    }

    pub fn frames_processed(&self) -> u64 {
        self.clock.frames()
    }

    pub fn process(&mut self, frame: &RgbImage, now: Instant) -> Result<FrameReport> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(VisionError::EmptyFrame);
        }
        let (width, height) = (width as i32, height as i32);
        let fps = self.clock.tick(now);

        // Stage 1: Color Segmentation
        let raw_mask = mask::in_range(frame, &self.config.hsv_range);
        let clean_mask = mask::clean(&raw_mask, &self.config.morphology);

        // Stage 2: Spatial Grouping
        let object_center = Point::new(width / 2, height / 2);
        let contours = contour::find_contours(&clean_mask);

        // Stage 3: Hand Localisation & Proximity
        let hand = contour::largest(&contours).and_then(|largest| self.locate_hand(largest, object_center));
        let state = hand
            .as_ref()
            .map(|h| self.config.zones.classify(h.distance))
            .unwrap_or(ProximityState::Safe);

        if state != self.last_state {
            log::info!("proximity {} -> {}", self.last_state, state);
            self.last_state = state;
        }
        log::trace!(
            "frame {}: {} contours, hand {:?}, state {state}",
            self.clock.frames(),
            contours.len(),
            hand.as_ref().map(|h| (h.center, h.distance))
        );

        // Stage 4: Overlay
        let overlay = self.build_overlay(width, height, object_center, hand.as_ref(), state, fps, now);

        Ok(FrameReport {
            state,
            object_center,
            hand,
            fps,
            mask: clean_mask,
            overlay,
        })
    }

    fn locate_hand(&mut self, largest: &Contour, object_center: Point) -> Option<HandDetection> {
        let moments = largest.moments();
        if moments.m00 <= self.config.min_contour_area {
            return None;
        }
        let raw_centroid = moments.centroid()?;
        let center = self.smoother.push(raw_centroid);
        let distance = crate::core_modules::proximity::distance(center, object_center);

        Some(HandDetection {
            contour: largest.clone(),
            area: moments.m00,
            raw_centroid,
            center,
            distance,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_overlay(
        &mut self,
        width: i32,
        height: i32,
        object_center: Point,
        hand: Option<&HandDetection>,
        state: ProximityState,
        fps: f64,
        now: Instant,
    ) -> Overlay {
        let mut overlay = Overlay::new();

        if let Some(hand) = hand {
            self.visuals.target_marker(&mut overlay, &hand.contour, hand.center);
            if state == ProximityState::Warning {
                overlay.line(hand.center, object_center, Rgb::YELLOW, 1);
            }
        }

        self.visuals.energy_core(
            &mut overlay,
            object_center,
            self.config.zones.object_radius,
            state,
            now,
        );
        self.visuals.hud(&mut overlay, width, height, state, fps, now);

        overlay
    }
}
