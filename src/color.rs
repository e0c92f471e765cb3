//! Role colours and terminal painting.
//!
//! Team roles get well-spread hues by stepping around the colour wheel with
//! the golden-ratio conjugate, so consecutive teams never look alike.

use std::fmt;

/// Golden-ratio conjugate, `(√5 − 1) / 2`.
pub const PHI: f64 = 0.618_033_988_749_894_9;

/// ANSI escape codes used by the simulator output.
pub mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
}

use codes::*;

/// A 24-bit RGB colour as stored on a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl Colour {
    /// Colour of a freshly opened lobby role.
    pub const RED: Colour = Colour(0xe7_4c_3c);

    /// Build a colour from its components.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    /// Build a colour from hue/saturation/value, each in `0.0..=1.0`.
    ///
    /// The hue wraps, so `1.25` is the same as `0.25`.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let (r, g, b) = hsv_to_rgb(h.rem_euclid(1.0), s, v);
        Self::from_rgb(to_channel(r), to_channel(g), to_channel(b))
    }

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Colour of the `index`-th team (1-based).
pub fn team_colour(index: usize) -> Colour {
    Colour::from_hsv(index as f64 * PHI, 1.0, 1.0)
}

fn to_channel(x: f64) -> u8 {
    (x * 255.0).clamp(0.0, 255.0) as u8
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Paint text in a role colour (24-bit terminal escape).
pub fn paint(text: &str, colour: Colour) -> String {
    format!(
        "{}\x1b[38;2;{};{};{}m{}{}",
        BOLD,
        colour.r(),
        colour.g(),
        colour.b(),
        text,
        RESET
    )
}

/// Dim text (secondary information such as ids).
pub fn dim(text: &str) -> String {
    format!("{}{}{}", DIM, text, RESET)
}

/// Bold label.
pub fn label(text: &str) -> String {
    format!("{}{}{}", BOLD, text, RESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hsv_primaries() {
        assert_eq!(Colour::from_hsv(0.0, 1.0, 1.0), Colour(0xff0000));
        assert_eq!(Colour::from_hsv(1.0 / 3.0, 1.0, 1.0), Colour(0x00ff00));
        assert_eq!(Colour::from_hsv(2.0 / 3.0, 1.0, 1.0), Colour(0x0000ff));
    }

    #[test]
    fn test_from_hsv_grey_when_unsaturated() {
        assert_eq!(Colour::from_hsv(0.4, 0.0, 1.0), Colour(0xffffff));
        assert_eq!(Colour::from_hsv(0.4, 0.0, 0.0), Colour(0x000000));
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(Colour::from_hsv(1.25, 1.0, 1.0), Colour::from_hsv(0.25, 1.0, 1.0));
    }

    #[test]
    fn test_team_colours_are_distinct() {
        let colours: Vec<Colour> = (1..=8).map(team_colour).collect();
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_rgb_components_round_trip() {
        let c = Colour::from_rgb(0x12, 0x34, 0x56);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
        assert_eq!(c.to_string(), "#123456");
    }

    #[test]
    fn test_paint_wraps_in_escape_codes() {
        let painted = paint("Team 1", Colour(0xff0000));
        assert!(painted.contains("38;2;255;0;0"));
        assert!(painted.ends_with(RESET));
        assert!(dim("id").contains(DIM));
        assert!(label("x").contains(BOLD));
    }
}
