//! Quantile sparklines.
//!
//! A series of samples is mapped onto a palette of glyphs by rank: a sample's
//! bucket depends on how many samples are strictly smaller than it, not on its
//! distance from the minimum. Every bucket index is therefore in range for any
//! series length, and equal samples always share a glyph.

use std::fmt::Write as _;

use crate::color::{self, Style};
use crate::error::SparklineError;

/// Block glyphs from lowest to highest.
pub const BLOCKS: [char; 7] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇'];

/// Fallback glyphs for terminals without block elements.
pub const ASCII: [char; 7] = ['_', '.', '-', '=', '+', '*', '#'];

/// An ordered set of glyphs of increasing magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    pub fn new(glyphs: impl Into<Vec<char>>) -> Result<Self, SparklineError> {
        let glyphs = glyphs.into();
        if glyphs.len() < 2 {
            return Err(SparklineError::PaletteTooSmall(glyphs.len()));
        }
        Ok(Self { glyphs })
    }

    pub fn blocks() -> Self {
        Self { glyphs: BLOCKS.to_vec() }
    }

    pub fn ascii() -> Self {
        Self { glyphs: ASCII.to_vec() }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, bucket: usize) -> char {
        self.glyphs[bucket.min(self.glyphs.len() - 1)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::blocks()
    }
}

/// Smallest and largest sample of a non-empty series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// The rendered form of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    glyphs: Vec<char>,
    buckets: Vec<usize>,
    range: Option<Range>,
    colors: Vec<color::ColorClass>,
}

impl Sparkline {
    /// Bucket index per sample, in the original order.
    pub fn buckets(&self) -> &[usize] {
        &self.buckets
    }

    /// `None` for an empty series.
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The glyph line without color or summary.
    pub fn glyphs(&self) -> String {
        self.glyphs.iter().collect()
    }

    /// `" <min> <max>"` rounded to whole numbers, or `None` for an empty series.
    pub fn summary(&self) -> Option<String> {
        self.range.map(|r| format!(" {:.0} {:.0}", r.min, r.max))
    }

    /// Glyph line in the requested style, followed by the summary when there is one.
    pub fn display(&self, style: Style) -> String {
        let mut out = String::new();
        for (glyph, class) in self.glyphs.iter().zip(&self.colors) {
            match style {
                Style::Plain => out.push(*glyph),
                Style::Ansi => {
                    let _ = write!(out, "{}{glyph}{}", class.sgr(), color::RESET);
                }
            }
        }
        if let Some(summary) = self.summary() {
            out.push_str(&summary);
        }
        out
    }
}

/// Encode `series` onto `palette`.
pub fn render(series: &[f64], palette: &Palette) -> Result<Sparkline, SparklineError> {
    let buckets = buckets(series, palette.len())?;
    let glyphs = buckets.iter().map(|&b| palette.glyph(b)).collect();

    Ok(Sparkline {
        glyphs,
        buckets,
        range: min_max(series),
        colors: color::classify(series),
    })
}

/// Assign every sample a bucket in `[0, nb)`.
///
/// The bucket is `floor(rank * nb / n)` where `rank` counts the samples strictly
/// smaller than this one.
pub fn buckets(series: &[f64], nb: usize) -> Result<Vec<usize>, SparklineError> {
    if nb < 2 {
        return Err(SparklineError::PaletteTooSmall(nb));
    }
    if let Some((index, &value)) = series.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SparklineError::NonFiniteSample { index, value });
    }

    let n = series.len();
    let mut sorted = series.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(series
        .iter()
        .map(|&v| {
            let rank = sorted.partition_point(|&x| x < v);
            (rank * nb / n).min(nb - 1)
        })
        .collect())
}

fn min_max(series: &[f64]) -> Option<Range> {
    let (&first, rest) = series.split_first()?;
    Some(rest.iter().fold(Range { min: first, max: first }, |r, &v| Range {
        min: r.min.min(v),
        max: r.max.max(v),
    }))
}
