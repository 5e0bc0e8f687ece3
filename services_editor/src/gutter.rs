//! Line-number gutter geometry

/// Gutter sized to the widest line number.
///
/// Widths are in the host's units (pixels for a GUI, cells for text output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberGutter {
    digit_advance: u32,
}

/// Fixed padding around the digits
pub const GUTTER_PADDING: u32 = 3;

impl LineNumberGutter {
    pub fn new(digit_advance: u32) -> Self {
        Self { digit_advance }
    }

    /// Decimal digits of `max(1, line_count)`
    pub fn digits(line_count: usize) -> usize {
        let mut remaining = line_count.max(1);
        let mut digits = 1;
        while remaining >= 10 {
            remaining /= 10;
            digits += 1;
        }
        digits
    }

    pub fn width(&self, line_count: usize) -> u32 {
        GUTTER_PADDING + self.digit_advance * Self::digits(line_count) as u32
    }

    /// 1-based label for `row`, right-aligned to the digit count
    pub fn label(&self, row: usize, line_count: usize) -> String {
        format!("{:>width$}", row + 1, width = Self::digits(line_count))
    }
}

impl Default for LineNumberGutter {
    fn default() -> Self {
        Self::new(1)
    }
}
