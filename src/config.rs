// Declarative chart configuration

use crate::data::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete input for one chart instance. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDto {
    #[serde(default)]
    pub data: Vec<Row>,
    pub config: ChartConfig,
}

impl ChartDto {
    pub fn new(data: Vec<Row>, config: ChartConfig) -> Self {
        Self { data, config }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default, alias = "chartId")]
    pub id: String,
    pub chart_type: ChartType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub x_axis: AxisSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axes: Option<Vec<AxisSpec>>,
    #[serde(default, alias = "defaultViewId", skip_serializing_if = "Option::is_none")]
    pub default_view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_views: Option<Vec<ViewSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipConfig>,
}

impl ChartConfig {
    /// The declared `yAxes`, or an empty slice.
    pub fn y_axes(&self) -> &[AxisSpec] {
        self.y_axes.as_deref().unwrap_or(&[])
    }

    /// `yAxis` if present, otherwise the first of `yAxes`.
    pub fn primary_y_axis(&self) -> Option<&AxisSpec> {
        self.y_axis.as_ref().or_else(|| self.y_axes().first())
    }

    /// `yAxes` when declared and non-empty, otherwise the singleton `yAxis`.
    pub fn series_axes(&self) -> Vec<&AxisSpec> {
        match self.y_axes() {
            [] => self.y_axis.iter().collect(),
            axes => axes.iter().collect(),
        }
    }

    pub fn views(&self) -> &[ViewSpec] {
        self.available_views.as_deref().unwrap_or(&[])
    }

    pub fn find_view(&self, view_id: &str) -> Option<&ViewSpec> {
        self.views().iter().find(|v| v.view_id == view_id)
    }
}

/// Declared chart family. Unknown names are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ChartType {
    #[default]
    Line,
    Area,
    StackedArea,
    Bar,
    StackedBar,
    ClusteredBar,
    MultiAxis,
    Mixed,
    Pie,
    Scatter,
    Table,
    Comparison,
    None,
    Other(String),
}

impl ChartType {
    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::StackedArea => "stacked-area",
            ChartType::Bar => "bar",
            ChartType::StackedBar => "stacked-bar",
            ChartType::ClusteredBar => "clustered-bar",
            ChartType::MultiAxis => "multi-axis",
            ChartType::Mixed => "mixed",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Table => "table",
            ChartType::Comparison => "comparison",
            ChartType::None => "none",
            ChartType::Other(name) => name,
        }
    }
}

impl From<String> for ChartType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "line" => ChartType::Line,
            "area" => ChartType::Area,
            "stacked-area" => ChartType::StackedArea,
            "bar" => ChartType::Bar,
            "stacked-bar" => ChartType::StackedBar,
            "clustered-bar" => ChartType::ClusteredBar,
            "multi-axis" => ChartType::MultiAxis,
            "mixed" => ChartType::Mixed,
            "pie" => ChartType::Pie,
            "scatter" => ChartType::Scatter,
            "table" => ChartType::Table,
            "comparison" => ChartType::Comparison,
            "none" => ChartType::None,
            _ => ChartType::Other(name),
        }
    }
}

impl From<&str> for ChartType {
    fn from(name: &str) -> Self {
        ChartType::from(name.to_string())
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChartType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ChartType::from)
    }
}

/// Which column an axis reads and how its values are displayed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_id: Option<String>,
    #[serde(default)]
    pub data_column: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(default, rename = "chartType", alias = "seriesChartType", skip_serializing_if = "Option::is_none")]
    pub series_chart_type: Option<SeriesChartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<AxisScale>,
    #[serde(default, alias = "stackingMode", skip_serializing_if = "Option::is_none")]
    pub stacking: Option<StackingMode>,
    /// Explicit series color; always wins over palette cycling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AxisSpec {
    pub fn new(data_column: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            data_column: data_column.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Value symbol shown next to numbers on this axis. An unset unit means currency.
    pub fn value_symbol(&self) -> &'static str {
        self.unit.unwrap_or(Unit::Currency).symbol()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(alias = "$")]
    Currency,
    #[serde(alias = "%")]
    Percent,
    Count,
    Ratio,
    None,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Currency => "$",
            Unit::Percent => "%",
            Unit::Count | Unit::Ratio | Unit::None => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesChartType {
    #[default]
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    #[serde(alias = "value")]
    Linear,
    #[serde(alias = "log")]
    Logarithmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackingMode {
    None,
    Normal,
    Percent,
}

impl StackingMode {
    /// Stack group name handed to the renderer; empty means unstacked.
    pub fn group_name(self) -> &'static str {
        match self {
            StackingMode::None => "",
            StackingMode::Normal => "normal",
            StackingMode::Percent => "percent",
        }
    }
}

/// One selectable lens over the same dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpec {
    pub view_id: String,
    pub y_axis: AxisSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipConfig {
    pub trigger: TooltipTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_formatter_type: Option<ValueFormatterType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    Item,
    Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormatterType {
    Currency,
    Percent,
    Abbreviate,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_config() {
        let config: ChartConfig = serde_json::from_value(json!({
            "chartId": "fees-1",
            "chartType": "stacked-area",
            "title": "Fees",
            "xAxis": {"dataColumn": "date", "label": "Date"},
            "yAxes": [
                {"dataColumn": "fees", "label": "Fees", "unit": "$", "chartType": "bar", "scale": "log"},
                {"axisId": "rev", "dataColumn": "revenue", "label": "Revenue", "unit": "percent", "stacking": "normal"}
            ],
            "defaultView": "absolute",
            "availableViews": [
                {"viewId": "absolute", "yAxis": {"dataColumn": "fees", "label": "Fees", "unit": "currency"}}
            ],
            "tooltip": {"trigger": "axis", "valueFormatterType": "abbreviate"}
        }))
        .unwrap();

        assert_eq!(config.id, "fees-1");
        assert_eq!(config.chart_type, ChartType::StackedArea);
        assert_eq!(config.description, "");
        let axes = config.y_axes();
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[0].unit, Some(Unit::Currency));
        assert_eq!(axes[0].series_chart_type, Some(SeriesChartType::Bar));
        assert_eq!(axes[0].scale, Some(AxisScale::Logarithmic));
        assert_eq!(axes[1].stacking, Some(StackingMode::Normal));
        assert_eq!(axes[1].unit, Some(Unit::Percent));
        assert_eq!(config.default_view.as_deref(), Some("absolute"));
        assert!(config.find_view("absolute").is_some());
        assert!(config.find_view("missing").is_none());
        assert_eq!(config.tooltip.unwrap().trigger, TooltipTrigger::Axis);
    }

    #[test]
    fn test_unknown_chart_type_is_kept() {
        let config: ChartConfig = serde_json::from_value(json!({
            "chartType": "sankey",
            "xAxis": {"dataColumn": "x"}
        }))
        .unwrap();
        assert_eq!(config.chart_type, ChartType::Other("sankey".to_string()));
        assert_eq!(config.chart_type.to_string(), "sankey");
    }

    #[test]
    fn test_chart_type_names_round_trip() {
        for name in ["line", "stacked-area", "clustered-bar", "multi-axis", "comparison", "none"] {
            assert_eq!(ChartType::from(name).as_str(), name);
        }
    }

    #[test]
    fn test_axis_accessors() {
        let mut config = ChartConfig {
            y_axis: Some(AxisSpec::new("v", "V")),
            ..Default::default()
        };
        assert_eq!(config.primary_y_axis().unwrap().data_column, "v");
        assert_eq!(config.series_axes().len(), 1);

        config.y_axis = None;
        config.y_axes = Some(vec![AxisSpec::new("a", "A"), AxisSpec::new("b", "B")]);
        assert_eq!(config.primary_y_axis().unwrap().data_column, "a");
        assert_eq!(config.series_axes().len(), 2);

        config.y_axes = None;
        assert!(config.primary_y_axis().is_none());
        assert!(config.series_axes().is_empty());
    }

    #[test]
    fn test_value_symbol() {
        assert_eq!(AxisSpec::new("v", "V").value_symbol(), "$");
        assert_eq!(AxisSpec::new("v", "V").with_unit(Unit::Percent).value_symbol(), "%");
        assert_eq!(AxisSpec::new("v", "V").with_unit(Unit::Count).value_symbol(), "");
    }

    #[test]
    fn test_unit_symbols() {
        let cases = [
            ("currency", "$"),
            ("$", "$"),
            ("percent", "%"),
            ("%", "%"),
            ("count", ""),
            ("ratio", ""),
            ("none", ""),
        ];
        for (name, symbol) in cases {
            let unit: Unit = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(unit.symbol(), symbol, "unit {}", name);
        }
        assert!(serde_json::from_value::<Unit>(json!("usd")).is_err());
    }
}
