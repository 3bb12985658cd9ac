use crate::error::PlotError;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Square,
    TriangleDown,
    Diamond,
    Circle,
}

/// How one series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub line_color: &'static str,
    pub fill_color: &'static str,
    pub marker: Marker,
    pub marker_size: u32,
}

pub const GREEN: Style = Style {
    line_color: "#557555",
    fill_color: "#C5E1C5",
    marker: Marker::Square,
    marker_size: 10,
};

pub const YELLOW: Style = Style {
    line_color: "#8f8a5a",
    fill_color: "#fffaca",
    marker: Marker::TriangleDown,
    marker_size: 11,
};

pub const RED: Style = Style {
    line_color: "#8f5252",
    fill_color: "#ffc2c2",
    marker: Marker::Diamond,
    marker_size: 9,
};

pub const PURPLE: Style = Style {
    line_color: "#52528f",
    fill_color: "#c2c2ff",
    marker: Marker::Circle,
    marker_size: 10,
};

/// Styles handed out to the series of a chart, in order.
pub const PALETTE: &[Style] = &[GREEN, YELLOW, RED, PURPLE];

/// Hands out each palette entry at most once per chart.
#[derive(Debug, Clone)]
pub struct StyleAllocator {
    palette: &'static [Style],
    next: usize,
}

impl Default for StyleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleAllocator {
    pub fn new() -> Self {
        Self::with_palette(PALETTE)
    }

    pub fn with_palette(palette: &'static [Style]) -> Self {
        Self { palette, next: 0 }
    }

    /// Returns the next unused style.
    pub fn allocate(&mut self) -> Result<Style, PlotError> {
        let style = self.palette.get(self.next).copied().ok_or(
            PlotError::PaletteExhausted {
                size: self.palette.len(),
            },
        )?;
        self.next += 1;
        Ok(style)
    }

    /// Makes the whole palette available again.
    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn remaining(&self) -> usize {
        self.palette.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::collections::HashSet;

    #[test]
    fn palette_entries_are_distinct() {
        let colors: HashSet<_> =
            PALETTE.iter().map(|style| style.line_color).collect();
        let fills: HashSet<_> =
            PALETTE.iter().map(|style| style.fill_color).collect();
        let markers: HashSet<_> =
            PALETTE.iter().map(|style| style.marker).collect();
        assert!(PALETTE.len() >= 4);
        assert_eq!(colors.len(), PALETTE.len());
        assert_eq!(fills.len(), PALETTE.len());
        assert_eq!(markers.len(), PALETTE.len());
    }

    #[test]
    fn allocate_in_order_until_exhausted() {
        let mut allocator = StyleAllocator::new();
        assert_eq!(allocator.allocate(), Ok(GREEN));
        assert_eq!(allocator.allocate(), Ok(YELLOW));
        assert_eq!(allocator.allocate(), Ok(RED));
        assert_eq!(allocator.allocate(), Ok(PURPLE));
        assert_eq!(allocator.remaining(), 0);
        assert_eq!(
            allocator.allocate(),
            Err(PlotError::PaletteExhausted { size: 4 })
        );

        // a reset starts over
        allocator.reset();
        assert_eq!(allocator.remaining(), 4);
        assert_eq!(allocator.allocate(), Ok(GREEN));
    }

    #[test]
    fn allocators_are_independent() {
        let mut first = StyleAllocator::new();
        first.allocate().unwrap();
        first.allocate().unwrap();
        let mut second = StyleAllocator::new();
        assert_eq!(second.allocate(), Ok(GREEN));
        assert_eq!(first.allocate(), Ok(RED));
    }

    #[quickcheck]
    fn never_repeats_before_reset(count: usize) -> bool {
        let count = count % (PALETTE.len() + 3);
        let mut allocator = StyleAllocator::new();
        let mut seen = HashSet::new();
        for i in 0..count {
            match allocator.allocate() {
                Ok(style) => {
                    if !seen.insert(style) || i >= PALETTE.len() {
                        return false;
                    }
                }
                Err(PlotError::PaletteExhausted { size }) => {
                    if i < PALETTE.len() || size != PALETTE.len() {
                        return false;
                    }
                }
                Err(_) => return false,
            }
        }
        true
    }
}
