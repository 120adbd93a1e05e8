use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use winq_expr::FrameMode;

use crate::UnsupportedFrameError;

/// The value of a bound in the two-integer frame encoding that means
/// "unbounded or unsupported".
pub const LEGACY_UNBOUNDED: i64 = i64::MIN;

/// One end of a window frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(u64),
    Following(u64),
    /// A bound that cannot be expressed, such as the first or last row of a peer group.
    Unsupported,
}

impl Display for FrameBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FrameBound::UnboundedPreceding => f.write_str("unbounded preceding"),
            FrameBound::UnboundedFollowing => f.write_str("unbounded following"),
            FrameBound::CurrentRow => f.write_str("current row"),
            FrameBound::Preceding(n) => write!(f, "{} preceding", n),
            FrameBound::Following(n) => write!(f, "{} following", n),
            FrameBound::Unsupported => f.write_str("unsupported"),
        }
    }
}

impl FrameBound {
    /// Encodes the bound as a signed row offset relative to the current row.
    ///
    /// Unbounded and unsupported bounds become [`LEGACY_UNBOUNDED`].
    pub fn to_legacy(self) -> i64 {
        let clamp = |n: u64| n.min(i64::MAX as u64) as i64;
        match self {
            FrameBound::CurrentRow => 0,
            FrameBound::Preceding(n) => -clamp(n),
            FrameBound::Following(n) => clamp(n),
            FrameBound::UnboundedPreceding
            | FrameBound::UnboundedFollowing
            | FrameBound::Unsupported => LEGACY_UNBOUNDED,
        }
    }

    fn from_legacy(value: i64) -> FrameBound {
        match value {
            LEGACY_UNBOUNDED => FrameBound::Unsupported,
            0 => FrameBound::CurrentRow,
            n if n < 0 => FrameBound::Preceding(n.unsigned_abs()),
            n => FrameBound::Following(n as u64),
        }
    }

    /// Decodes the start bound of a frame in the two-integer encoding.
    ///
    /// The sentinel cannot be told apart from an unsupported bound, so it
    /// decodes to [`FrameBound::Unsupported`].
    pub fn from_legacy_start(value: i64) -> FrameBound {
        Self::from_legacy(value)
    }

    /// Decodes the end bound of a frame in the two-integer encoding.
    pub fn from_legacy_end(value: i64) -> FrameBound {
        Self::from_legacy(value)
    }
}

/// The rows of a partition an aggregate is computed over, relative to the current row.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WindowFrame {
    pub start: FrameBound,
    pub end: FrameBound,
}

impl Default for WindowFrame {
    fn default() -> Self {
        Self {
            start: FrameBound::UnboundedPreceding,
            end: FrameBound::CurrentRow,
        }
    }
}

impl Display for WindowFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "rows between {} and {}", self.start, self.end)
    }
}

impl WindowFrame {
    pub fn new(start: FrameBound, end: FrameBound) -> Self {
        Self { start, end }
    }

    /// Returns how the frame is evaluated.
    ///
    /// Without order keys every row of a partition is a peer of every other
    /// row, so the running frame covers the whole partition.
    pub fn mode(&self, has_order_keys: bool) -> Result<FrameMode, UnsupportedFrameError> {
        match (self.start, self.end) {
            (FrameBound::UnboundedPreceding, FrameBound::CurrentRow) if has_order_keys => {
                Ok(FrameMode::Running)
            }
            (FrameBound::UnboundedPreceding, FrameBound::CurrentRow)
            | (FrameBound::UnboundedPreceding, FrameBound::UnboundedFollowing) => {
                Ok(FrameMode::WholePartition)
            }
            (start, end) => Err(UnsupportedFrameError { start, end }),
        }
    }

    pub fn to_legacy(&self) -> (i64, i64) {
        (self.start.to_legacy(), self.end.to_legacy())
    }

    pub fn from_legacy(start: i64, end: i64) -> Self {
        Self {
            start: FrameBound::from_legacy_start(start),
            end: FrameBound::from_legacy_end(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode() {
        let running = WindowFrame::default();
        assert_eq!(running.mode(true), Ok(FrameMode::Running));
        assert_eq!(running.mode(false), Ok(FrameMode::WholePartition));

        let whole = WindowFrame::new(FrameBound::UnboundedPreceding, FrameBound::UnboundedFollowing);
        assert_eq!(whole.mode(true), Ok(FrameMode::WholePartition));
        assert_eq!(whole.mode(false), Ok(FrameMode::WholePartition));
    }

    #[test]
    fn test_unsupported_frames() {
        for (start, end) in vec![
            (FrameBound::Preceding(3), FrameBound::CurrentRow),
            (FrameBound::UnboundedPreceding, FrameBound::Following(1)),
            (FrameBound::CurrentRow, FrameBound::UnboundedFollowing),
            (FrameBound::CurrentRow, FrameBound::CurrentRow),
            (FrameBound::UnboundedFollowing, FrameBound::UnboundedPreceding),
            (FrameBound::Unsupported, FrameBound::Unsupported),
        ] {
            assert_eq!(
                WindowFrame::new(start, end).mode(true),
                Err(UnsupportedFrameError { start, end })
            );
        }
    }

    #[test]
    fn test_legacy_encoding() {
        assert_eq!(
            WindowFrame::default().to_legacy(),
            (LEGACY_UNBOUNDED, 0)
        );
        assert_eq!(
            WindowFrame::new(FrameBound::Preceding(2), FrameBound::Following(5)).to_legacy(),
            (-2, 5)
        );
        assert_eq!(
            WindowFrame::from_legacy(-2, 0),
            WindowFrame::new(FrameBound::Preceding(2), FrameBound::CurrentRow)
        );
        assert_eq!(
            WindowFrame::from_legacy(LEGACY_UNBOUNDED, LEGACY_UNBOUNDED),
            WindowFrame::new(FrameBound::Unsupported, FrameBound::Unsupported)
        );
        assert_eq!(FrameBound::Preceding(u64::MAX).to_legacy(), -i64::MAX);
    }
}
