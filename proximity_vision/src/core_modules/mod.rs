pub mod contour;
pub mod frame_clock;
pub mod hsv;
pub mod mask;
pub mod overlay;
pub mod proximity;
pub mod smoother;
pub mod visuals;
