use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::config::{AxisScale, AxisSpec, SeriesChartType, TooltipConfig, Unit, ViewSpec};
use crate::data::{Row, Value};
use crate::error::ConfigurationError;
use crate::palette::ColorPalette;
use crate::RenderOptions;

// =============================================================================
// Phase 1: View Resolution
// =============================================================================

/// The dataset and y-axis that are active for one render pass.
#[derive(Debug, Clone)]
pub struct ResolvedView<'a> {
    /// Borrowed when no transformation ran.
    pub data: Cow<'a, [Row]>,
    pub value_symbol: String,
    pub y_axis: Option<&'a AxisSpec>,
    /// The matched view, if any.
    pub view: Option<&'a ViewSpec>,
}

impl ResolvedView<'_> {
    pub fn is_transformed(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }
}

// =============================================================================
// Phase 2: Chart Props
// =============================================================================

/// Area chart rows: bare `[timestamp, value]` pairs for a single series,
/// one record per row keyed by series label otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AreaChartData {
    Points(Vec<(i64, f64)>),
    Records(Vec<AreaRecord>),
}

impl AreaChartData {
    pub fn len(&self) -> usize {
        match self {
            AreaChartData::Points(points) => points.len(),
            AreaChartData::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRecord {
    pub date: i64,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaChartProps {
    pub title: String,
    pub chart_data: AreaChartData,
    pub stacks: Vec<String>,
    pub stack_colors: IndexMap<String, String>,
    pub value_symbol: String,
    pub is_stacked_chart: bool,
    pub y_axis_scale: AxisScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipConfig>,
    pub display: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartProps {
    pub title: String,
    /// `[x, y]` with x exactly as it appears in the row.
    pub chart_data: Vec<(Value, f64)>,
    pub value_symbol: String,
    pub color: String,
    /// Present only for stacked bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacks: Option<IndexMap<String, String>>,
    pub display: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterRow {
    pub category: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredBarProps {
    pub title: String,
    pub chart_data: Vec<ClusterRow>,
    pub clusters: Vec<String>,
    pub stack_colors: IndexMap<String, String>,
    pub value_symbol: String,
    pub group_by: String,
    pub display: RenderOptions,
}

/// One bar series of a clustered chart, drawn against its own y-scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSeries {
    pub name: String,
    pub data: Vec<f64>,
    pub y_axis_index: usize,
    pub color: String,
}

/// Category axis and per-cluster series for renderers that draw one bar
/// series per cluster. Not part of the serialized props.
impl ClusteredBarProps {
    /// Unique categories in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = indexmap::IndexSet::new();
        for row in &self.chart_data {
            seen.insert(row.category.as_str());
        }
        seen.into_iter().collect()
    }

    /// One series per cluster, aligned to `categories()`.
    ///
    /// A category that appears on several rows takes the values of its first
    /// row. Missing values read as 0.
    pub fn series(&self) -> Vec<ClusterSeries> {
        let categories = self.categories();
        let palette = ColorPalette::series();

        self.clusters
            .iter()
            .enumerate()
            .map(|(idx, cluster)| {
                let data = categories
                    .iter()
                    .map(|category| {
                        self.chart_data
                            .iter()
                            .find(|row| row.category == *category)
                            .and_then(|row| row.values.get(cluster).copied())
                            .unwrap_or(0.0)
                    })
                    .collect();
                let color = self
                    .stack_colors
                    .get(cluster)
                    .cloned()
                    .unwrap_or_else(|| palette.color_at(idx).to_string());

                ClusterSeries {
                    name: cluster.clone(),
                    data,
                    y_axis_index: idx,
                    color,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedSeries {
    pub data: Vec<(i64, f64)>,
    #[serde(rename = "type")]
    pub series_type: SeriesChartType,
    pub name: String,
    /// Stack group; empty when unstacked.
    pub stack: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedChartProps {
    /// Keyed by axis id, or label when the axis has none.
    pub charts: IndexMap<String, MixedSeries>,
    pub value_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    pub display: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartProps {
    pub title: String,
    pub chart_data: Vec<PieSlice>,
    pub stack_colors: IndexMap<String, String>,
    pub usd_format: bool,
    pub show_legend: bool,
    pub display: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterChartProps {
    pub title: String,
    pub chart_data: Vec<(f64, f64)>,
    pub value_symbol: String,
    pub display: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub key: String,
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProps {
    pub title: String,
    pub description: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Row>,
}

// =============================================================================
// Phase 3: Dispatch Result
// =============================================================================

/// What the renderer receives for one chart. Serialized as
/// `{"kind": ..., "props": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "props", rename_all = "kebab-case")]
pub enum ChartOutput {
    Area(AreaChartProps),
    Bar(BarChartProps),
    ClusteredBar(ClusteredBarProps),
    Mixed(MixedChartProps),
    Pie(PieChartProps),
    Scatter(ScatterChartProps),
    Table(TableProps),
    /// `none` chart type: render nothing.
    #[serde(rename = "none")]
    Hidden,
    Error(#[serde(serialize_with = "serialize_error")] ConfigurationError),
    Unsupported(UnsupportedChart),
}

impl ChartOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            ChartOutput::Area(_) => "area",
            ChartOutput::Bar(_) => "bar",
            ChartOutput::ClusteredBar(_) => "clustered-bar",
            ChartOutput::Mixed(_) => "mixed",
            ChartOutput::Pie(_) => "pie",
            ChartOutput::Scatter(_) => "scatter",
            ChartOutput::Table(_) => "table",
            ChartOutput::Hidden => "none",
            ChartOutput::Error(_) => "error",
            ChartOutput::Unsupported(_) => "unsupported",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChartOutput::Error(_))
    }
}

/// Raw-data preview for a chart type with no mapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedChart {
    pub chart_type: String,
    pub preview: serde_json::Value,
}

fn serialize_error<S: Serializer>(err: &ConfigurationError, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct ErrorPanel {
        message: String,
    }
    ErrorPanel { message: err.to_string() }.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clustered() -> ClusteredBarProps {
        let row = |category: &str, a: f64, b: Option<f64>| {
            let mut values = IndexMap::new();
            values.insert("A".to_string(), a);
            if let Some(b) = b {
                values.insert("B".to_string(), b);
            }
            ClusterRow { category: category.to_string(), values }
        };
        ClusteredBarProps {
            title: String::new(),
            chart_data: vec![row("x", 1.0, Some(2.0)), row("y", 3.0, None), row("x", 9.0, Some(9.0))],
            clusters: vec!["A".to_string(), "B".to_string()],
            stack_colors: [("B".to_string(), "#000000".to_string())].into_iter().collect(),
            value_symbol: "$".to_string(),
            group_by: "category".to_string(),
            display: RenderOptions::default(),
        }
    }

    #[test]
    fn test_cluster_series() {
        let props = clustered();
        assert_eq!(props.categories(), vec!["x", "y"]);

        let series = props.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].data, vec![1.0, 3.0]);
        assert_eq!(series[0].color, "#1f77b4");
        assert_eq!(series[1].data, vec![2.0, 0.0]);
        assert_eq!(series[1].y_axis_index, 1);
        assert_eq!(series[1].color, "#000000");
    }

    #[test]
    fn test_output_serialization() {
        let output = ChartOutput::Scatter(ScatterChartProps {
            title: "T".to_string(),
            chart_data: vec![(1.0, 2.0)],
            value_symbol: "$".to_string(),
            display: RenderOptions::default(),
        });
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["kind"], "scatter");
        assert_eq!(value["props"]["chartData"], json!([[1.0, 2.0]]));
        assert_eq!(value["props"]["valueSymbol"], "$");

        let hidden = serde_json::to_value(ChartOutput::Hidden).unwrap();
        assert_eq!(hidden, json!({"kind": "none"}));
    }

    #[test]
    fn test_error_serializes_message() {
        let output = ChartOutput::Error(ConfigurationError::MissingYAxis {
            chart_type: crate::config::ChartType::Pie,
        });
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["kind"], "error");
        assert_eq!(
            value["props"]["message"],
            "missing yAxis config: pie charts require at least one y-axis"
        );
    }

    #[test]
    fn test_area_records_flatten() {
        let mut values = IndexMap::new();
        values.insert("Fees".to_string(), 3.0);
        let data = AreaChartData::Records(vec![AreaRecord { date: 10, values }]);
        assert_eq!(serde_json::to_value(&data).unwrap(), json!([{"date": 10, "Fees": 3.0}]));
    }
}
