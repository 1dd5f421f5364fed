//! Primary monitor resolution.
//!
//! The resolution drives both image acceptance (wallpapers must cover the
//! screen) and the width of downscaled variants. A configured override wins;
//! otherwise the platform is probed, with a 2K fallback if probing fails.

use crate::config::ScreenOverride;

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    /// Returns a default screen size (2K) if detection fails.
    #[must_use]
    pub const fn default_2k() -> Self { Self { width: 2560, height: 1440 } }
}

impl From<ScreenOverride> for ScreenSize {
    fn from(value: ScreenOverride) -> Self { Self { width: value.width, height: value.height } }
}

/// Resolves the primary screen size, honoring a configured override.
#[must_use]
pub fn primary_screen_size(overridden: Option<ScreenOverride>) -> ScreenSize {
    if let Some(screen) = overridden {
        return screen.into();
    }

    detect_primary_screen().unwrap_or_else(|| {
        tracing::debug!("could not detect primary screen size, assuming 2560x1440");
        ScreenSize::default_2k()
    })
}

/// Gets the primary display size using Core Graphics.
#[cfg(target_os = "macos")]
#[allow(clippy::cast_possible_truncation)]
fn detect_primary_screen() -> Option<ScreenSize> {
    let display = core_graphics::display::CGDisplay::main();
    let width = display.pixels_wide() as u32;
    let height = display.pixels_high() as u32;

    if width == 0 || height == 0 {
        return None;
    }

    Some(ScreenSize { width, height })
}

/// Gets the primary output size from `xrandr`.
#[cfg(target_os = "linux")]
fn detect_primary_screen() -> Option<ScreenSize> {
    let output = std::process::Command::new("xrandr").arg("--current").output().ok()?;
    if !output.status.success() {
        return None;
    }

    parse_xrandr(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
const fn detect_primary_screen() -> Option<ScreenSize> { None }

/// Picks the primary output from `xrandr --current`, else the first connected one.
///
/// Connected outputs look like:
/// `DP-1 connected primary 2560x1440+0+0 (normal left inverted right) 597mm x 336mm`
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_xrandr(output: &str) -> Option<ScreenSize> {
    let mut first_connected = None;

    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        let _name = tokens.next();
        if tokens.next() != Some("connected") {
            continue;
        }

        let rest: Vec<&str> = tokens.collect();
        let Some(size) = rest.iter().find_map(|token| parse_geometry(token)) else {
            continue;
        };

        if rest.contains(&"primary") {
            return Some(size);
        }
        first_connected.get_or_insert(size);
    }

    first_connected
}

/// Parses `WIDTHxHEIGHT+X+Y`.
fn parse_geometry(token: &str) -> Option<ScreenSize> {
    let (size, _offset) = token.split_once('+')?;
    let (width, height) = size.split_once('x')?;
    let width = width.parse().ok()?;
    let height = height.parse().ok()?;

    if width == 0 || height == 0 {
        return None;
    }

    Some(ScreenSize { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    const XRANDR_DUAL: &str = "\
Screen 0: minimum 320 x 200, current 4480 x 1440, maximum 16384 x 16384
HDMI-1 connected 1920x1080+2560+0 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+
DP-1 connected primary 2560x1440+0+0 (normal left inverted right x axis y axis) 597mm x 336mm
   2560x1440     59.95*+
DP-2 disconnected (normal left inverted right x axis y axis)
";

    #[test]
    fn test_screen_size_default() {
        let default = ScreenSize::default_2k();
        assert_eq!(default.width, 2560);
        assert_eq!(default.height, 1440);
    }

    #[test]
    fn test_override_wins() {
        let screen = primary_screen_size(Some(ScreenOverride { width: 1280, height: 720 }));
        assert_eq!(screen, ScreenSize { width: 1280, height: 720 });
    }

    #[test]
    fn test_primary_screen_size_is_non_zero() {
        let screen = primary_screen_size(None);
        assert!(screen.width > 0);
        assert!(screen.height > 0);
    }

    #[test]
    fn test_parse_xrandr_prefers_primary() {
        assert_eq!(parse_xrandr(XRANDR_DUAL), Some(ScreenSize { width: 2560, height: 1440 }));
    }

    #[test]
    fn test_parse_xrandr_falls_back_to_first_connected() {
        let output = "\
eDP-1 connected 1920x1200+0+0 (normal left inverted right x axis y axis) 301mm x 188mm
HDMI-1 connected 3840x2160+1920+0 (normal left inverted right x axis y axis) 600mm x 340mm
";
        assert_eq!(parse_xrandr(output), Some(ScreenSize { width: 1920, height: 1200 }));
    }

    #[test]
    fn test_parse_xrandr_ignores_connected_without_mode() {
        let output = "HDMI-1 connected (normal left inverted right x axis y axis)\n";
        assert_eq!(parse_xrandr(output), None);
    }

    #[test]
    fn test_parse_xrandr_empty() {
        assert_eq!(parse_xrandr(""), None);
    }

    #[test]
    fn test_parse_geometry() {
        assert_eq!(parse_geometry("1920x1080+0+0"), Some(ScreenSize { width: 1920, height: 1080 }));
        assert_eq!(parse_geometry("(normal"), None);
        assert_eq!(parse_geometry("0x0+0+0"), None);
    }
}
