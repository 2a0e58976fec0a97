//! Cosmetic coloring for sparkline glyphs.
//!
//! Colors are assigned by position only and never influence bucketing.

pub const RESET: &str = "\x1b[0m";

/// How a sparkline is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    Ansi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    /// Even positions.
    Base,
    /// Odd positions.
    Bright,
    /// Every sixth position, starting at 0.
    Accent,
    /// The series maximum, wherever it falls.
    Highlight,
}

impl ColorClass {
    pub fn at(position: usize) -> Self {
        match position {
            i if i % 2 == 1 => ColorClass::Bright,
            i if i % 6 == 0 => ColorClass::Accent,
            _ => ColorClass::Base,
        }
    }

    /// SGR escape sequence selecting this class.
    pub fn sgr(&self) -> &'static str {
        match self {
            ColorClass::Base => "\x1b[36m",
            ColorClass::Bright => "\x1b[1;36m",
            ColorClass::Accent => "\x1b[37m",
            ColorClass::Highlight => "\x1b[31m",
        }
    }
}

/// One class per sample.
pub fn classify(series: &[f64]) -> Vec<ColorClass> {
    let max = series.iter().copied().reduce(f64::max);
    series
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if Some(v) == max {
                ColorClass::Highlight
            } else {
                ColorClass::at(i)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ColorClass::*;

    #[test]
    fn positional_rule() {
        let classes: Vec<_> = (0..8).map(ColorClass::at).collect();
        assert_eq!(classes, vec![Accent, Bright, Base, Bright, Base, Bright, Accent, Bright]);
    }

    #[test]
    fn maximum_is_highlighted_everywhere_it_occurs() {
        let classes = classify(&[1.0, 9.0, 2.0, 9.0, 3.0]);
        assert_eq!(classes, vec![Accent, Highlight, Base, Highlight, Base]);
    }

    #[test]
    fn flat_series_is_all_highlight() {
        assert_eq!(classify(&[4.0; 3]), vec![Highlight; 3]);
    }

    #[test]
    fn empty_series_has_no_classes() {
        assert!(classify(&[]).is_empty());
    }
}
