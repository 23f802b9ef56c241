use clap::Parser;
use proximity_vision::Settings;
use std::path::PathBuf;

/// Track a skin-colored hand on a webcam and warn as it nears a virtual energy core.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Camera device index to capture from.
    #[arg(short, long, env = "PROXIMITY_CAMERA", default_value_t = 0)]
    pub camera: i32,

    /// Read frames from a video file instead of a camera.
    #[arg(short, long, env = "PROXIMITY_INPUT", conflicts_with = "camera")]
    pub input: Option<PathBuf>,

    /// Record the annotated frames to this video file (mp4v).
    #[arg(short, long, env = "PROXIMITY_OUTPUT")]
    pub output: Option<PathBuf>,

    /// TOML settings file. Missing keys fall back to defaults.
    #[arg(long, env = "PROXIMITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Open a regular window instead of going fullscreen.
    #[arg(long)]
    pub windowed: bool,

    /// Do not mirror the image horizontally.
    #[arg(long)]
    pub no_mirror: bool,

    /// Run without any windows. Needs --input, since a live camera feed never ends.
    #[arg(long, requires = "input")]
    pub headless: bool,

    /// Directory that mask snapshots (the `m` key) are written to.
    #[arg(long, env = "PROXIMITY_DUMP_DIR", default_value = ".")]
    pub dump_dir: PathBuf,
}

impl Cli {
    /// Loads the settings file, if any, and applies command-line overrides on top.
    pub fn settings(&self) -> proximity_vision::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if self.windowed {
            settings.display.fullscreen = false;
        }
        if self.no_mirror {
            settings.display.mirror = false;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_capture_camera_zero() {
        let cli = Cli::try_parse_from(["proximity_hud"]).unwrap();
        assert_eq!(cli.camera, 0);
        assert!(cli.input.is_none());
        assert!(!cli.headless);
        let settings = cli.settings().unwrap();
        assert!(settings.display.fullscreen);
        assert!(settings.display.mirror);
    }

    #[test]
    fn flags_override_display_settings() {
        let cli = Cli::try_parse_from([
            "proximity_hud",
            "--input",
            "clip.mp4",
            "--windowed",
            "--no-mirror",
        ])
        .unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("clip.mp4")));
        let settings = cli.settings().unwrap();
        assert!(!settings.display.fullscreen);
        assert!(!settings.display.mirror);
    }

    #[test]
    fn camera_and_input_conflict() {
        assert!(Cli::try_parse_from(["proximity_hud", "--camera", "1", "--input", "a.mp4"]).is_err());
    }

    #[test]
    fn headless_needs_a_video_file() {
        assert!(Cli::try_parse_from(["proximity_hud", "--headless"]).is_err());
        let cli = Cli::try_parse_from(["proximity_hud", "--headless", "--input", "a.mp4"]).unwrap();
        assert!(cli.headless);
    }
}
