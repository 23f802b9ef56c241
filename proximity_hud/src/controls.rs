// The "Settings" window: six trackbars that edit the HSV threshold box live.

use opencv::highgui;
use proximity_vision::{Hsv, HsvRange, core_modules::hsv::{CHANNEL_MAX, HUE_MAX}};

pub const SETTINGS_WINDOW: &str = "Settings";

const LOWER_H: &str = "L - H";
const LOWER_S: &str = "L - S";
const LOWER_V: &str = "L - V";
const UPPER_H: &str = "U - H";
const UPPER_S: &str = "U - S";
const UPPER_V: &str = "U - V";

/// Handle to the trackbar window.
pub struct ThresholdControls;

impl ThresholdControls {
    /// Opens the settings window with trackbars positioned at `initial`.
    pub fn open(initial: HsvRange) -> opencv::Result<Self> {
        highgui::named_window(SETTINGS_WINDOW, highgui::WINDOW_AUTOSIZE)?;
        highgui::resize_window(SETTINGS_WINDOW, 300, 300)?;

        let bars = [
            (LOWER_H, HUE_MAX, initial.lower.h),
            (LOWER_S, CHANNEL_MAX, initial.lower.s),
            (LOWER_V, CHANNEL_MAX, initial.lower.v),
            (UPPER_H, HUE_MAX, initial.upper.h),
            (UPPER_S, CHANNEL_MAX, initial.upper.s),
            (UPPER_V, CHANNEL_MAX, initial.upper.v),
        ];
        for (name, max, value) in bars {
            highgui::create_trackbar(name, SETTINGS_WINDOW, None, max as i32, None)?;
            highgui::set_trackbar_pos(name, SETTINGS_WINDOW, value as i32)?;
        }

        Ok(Self)
    }

    /// Reads the current trackbar positions.
    pub fn read(&self) -> opencv::Result<HsvRange> {
        let pos = |name: &str| -> opencv::Result<u8> {
            let value = highgui::get_trackbar_pos(name, SETTINGS_WINDOW)?;
            Ok(value.clamp(0, CHANNEL_MAX as i32) as u8)
        };
        Ok(HsvRange::new(
            Hsv::new(pos(LOWER_H)?, pos(LOWER_S)?, pos(LOWER_V)?),
            Hsv::new(pos(UPPER_H)?, pos(UPPER_S)?, pos(UPPER_V)?),
        ))
    }
}
