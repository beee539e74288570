use micromath::F32Ext;

/// Intervals whose magnitude does not exceed this many semitones are classified as
/// [Same](enum.Contour.html#variant.Same).
pub const DEFAULT_SAME_THRESHOLD: f32 = 1.0;

/// The coarse direction of a melodic interval, sometimes called Parsons code.
/// Matching on contours instead of intervals trades discriminative power for
/// robustness against singers who get the direction right but the size wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contour {
    Up,
    Down,
    Same,
}

impl Contour {
    /// Classifies an interval in semitones.
    pub fn from_interval(interval: f32, same_threshold: f32) -> Self {
        if F32Ext::abs(interval) <= same_threshold {
            Contour::Same
        } else if interval > 0.0 {
            Contour::Up
        } else {
            Contour::Down
        }
    }

    /// Parses `U`, `D` or `S` (case insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Contour::Up),
            'D' => Some(Contour::Down),
            'S' => Some(Contour::Same),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Contour::Up => 'U',
            Contour::Down => 'D',
            Contour::Same => 'S',
        }
    }

    /// The numeric symbol fed to the matcher for this contour.
    pub fn symbol(self) -> f32 {
        match self {
            Contour::Up => 1.0,
            Contour::Down => -1.0,
            Contour::Same => 0.0,
        }
    }
}
