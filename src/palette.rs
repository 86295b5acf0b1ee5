// Fixed color palettes and order-stable color assignment

use indexmap::IndexMap;

/// Category-10 colors, in order. Pie slices and other per-category marks.
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// First six category colors. Area series and bar clusters.
pub const SERIES_PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// First three category colors. One per axis on dual-axis charts.
pub const DUAL_AXIS_PALETTE: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

/// A fixed, ordered color sequence indexed round-robin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    colors: &'static [&'static str],
}

impl ColorPalette {
    pub const fn category10() -> Self {
        Self { colors: &CATEGORY_PALETTE }
    }

    pub const fn series() -> Self {
        Self { colors: &SERIES_PALETTE }
    }

    pub const fn dual_axis() -> Self {
        Self { colors: &DUAL_AXIS_PALETTE }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The `index`-th color, wrapping around.
    pub fn color_at(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }

    /// Assign colors to keys by position.
    ///
    /// A repeated key keeps its first position in the map but takes the color
    /// of its last occurrence.
    pub fn assign_colors<S: AsRef<str>>(&self, keys: &[S]) -> IndexMap<String, String> {
        self.assign_with_overrides(keys.iter().map(|k| (k.as_ref(), None)))
    }

    /// Like `assign_colors`, but an explicit color for a key always wins.
    pub fn assign_with_overrides<'a, I>(&self, entries: I) -> IndexMap<String, String>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (key, explicit))| {
                let color = explicit.unwrap_or_else(|| self.color_at(idx));
                (key.to_string(), color.to_string())
            })
            .collect()
    }
}
