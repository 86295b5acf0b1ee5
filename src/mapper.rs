// Per-chart-family mapping from resolved rows to renderer props

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{AxisSpec, ChartDto, ChartType};
use crate::data::{cell, column_union, Row};
use crate::error::{ConfigurationError, MapperResult};
use crate::ir::{
    AreaChartData, AreaChartProps, AreaRecord, BarChartProps, ClusterRow, ClusteredBarProps,
    MixedChartProps, MixedSeries, PieChartProps, PieSlice, ResolvedView, ScatterChartProps,
    TableColumn, TableProps,
};
use crate::palette::ColorPalette;
use crate::RenderOptions;

/// Fallback name for a pie slice or cluster category with no usable label.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Line, area and stacked-area charts.
///
/// Every declared y-axis is plotted over the view's rows; the view only
/// contributes the value symbol and the y-scale.
pub fn map_area(dto: &ChartDto, view: &ResolvedView, options: &RenderOptions) -> MapperResult<AreaChartProps> {
    require_y_axis(dto)?;

    let axes = dto.config.series_axes();
    let x_col = dto.config.x_axis.data_column.as_str();

    let chart_data = match axes.as_slice() {
        [axis] => AreaChartData::Points(
            view.data
                .iter()
                .map(|row| (timestamp(row, x_col), cell(row, &axis.data_column).number_or(0.0)))
                .collect(),
        ),
        _ => AreaChartData::Records(
            view.data
                .iter()
                .map(|row| AreaRecord {
                    date: timestamp(row, x_col),
                    values: label_values(row, &axes),
                })
                .collect(),
        ),
    };

    Ok(AreaChartProps {
        title: dto.config.title.clone(),
        chart_data,
        stacks: axes.iter().map(|a| a.label.clone()).collect(),
        stack_colors: axis_colors(ColorPalette::series(), &axes),
        value_symbol: view.value_symbol.clone(),
        is_stacked_chart: dto.config.chart_type == ChartType::StackedArea,
        y_axis_scale: view.y_axis.and_then(|a| a.scale).unwrap_or_default(),
        tooltip: dto.config.tooltip.clone(),
        display: options.clone(),
    })
}

/// Bar and stacked-bar charts: one `[x, y]` pair per row, x as given.
pub fn map_bar(dto: &ChartDto, view: &ResolvedView, options: &RenderOptions) -> MapperResult<BarChartProps> {
    let axis = value_axis(dto)?;
    let x_col = dto.config.x_axis.data_column.as_str();

    let chart_data = view
        .data
        .iter()
        .map(|row| (cell(row, x_col).clone(), cell(row, &axis.data_column).number_or(0.0)))
        .collect();

    let color = axis
        .color
        .clone()
        .unwrap_or_else(|| ColorPalette::series().color_at(0).to_string());
    let stacks = (dto.config.chart_type == ChartType::StackedBar)
        .then(|| IndexMap::from([(axis.label.clone(), color.clone())]));

    Ok(BarChartProps {
        title: dto.config.title.clone(),
        chart_data,
        value_symbol: view.value_symbol.clone(),
        color,
        stacks,
        display: options.clone(),
    })
}

/// Clustered bars: one row per category with a value per y-axis label.
pub fn map_clustered_bar(
    dto: &ChartDto,
    view: &ResolvedView,
    options: &RenderOptions,
) -> MapperResult<ClusteredBarProps> {
    require_y_axis(dto)?;

    let axes = dto.config.series_axes();
    let x_col = dto.config.x_axis.data_column.as_str();

    let chart_data = view
        .data
        .iter()
        .map(|row| ClusterRow {
            category: cell(row, x_col).label_or(UNKNOWN_CATEGORY),
            values: label_values(row, &axes),
        })
        .collect();

    Ok(ClusteredBarProps {
        title: dto.config.title.clone(),
        chart_data,
        clusters: axes.iter().map(|a| a.label.clone()).collect(),
        stack_colors: axis_colors(ColorPalette::series(), &axes),
        value_symbol: view.value_symbol.clone(),
        group_by: "category".to_string(),
        display: options.clone(),
    })
}

/// Multi-axis and mixed line/bar charts: one time series per declared y-axis.
///
/// Reads the raw rows; views do not apply to dual-axis charts.
pub fn map_mixed(dto: &ChartDto, options: &RenderOptions) -> MapperResult<MixedChartProps> {
    let axes = dto.config.y_axes();
    if axes.len() < 2 {
        return Err(ConfigurationError::InsufficientYAxes {
            chart_type: dto.config.chart_type.clone(),
            required: 2,
            found: axes.len(),
        });
    }

    let x_col = dto.config.x_axis.data_column.as_str();
    let palette = ColorPalette::dual_axis();

    let charts = axes
        .iter()
        .enumerate()
        .map(|(idx, axis)| {
            let key = axis.axis_id.clone().unwrap_or_else(|| axis.label.clone());
            let series = MixedSeries {
                data: dto
                    .data
                    .iter()
                    .map(|row| (timestamp(row, x_col), cell(row, &axis.data_column).number_or(0.0)))
                    .collect(),
                series_type: axis.series_chart_type.unwrap_or_default(),
                name: axis.label.clone(),
                stack: axis.stacking.map_or("", |s| s.group_name()).to_string(),
                color: axis
                    .color
                    .clone()
                    .unwrap_or_else(|| palette.color_at(idx).to_string()),
            };
            (key, series)
        })
        .collect();

    Ok(MixedChartProps {
        charts,
        value_symbol: axes[0].value_symbol().to_string(),
        group_by: x_col.contains("date").then(|| "daily".to_string()),
        display: options.clone(),
    })
}

/// Pie charts: one slice per row, colored by row position.
pub fn map_pie(dto: &ChartDto, view: &ResolvedView, options: &RenderOptions) -> MapperResult<PieChartProps> {
    let axis = value_axis(dto)?;
    let x_col = dto.config.x_axis.data_column.as_str();

    let chart_data: Vec<PieSlice> = view
        .data
        .iter()
        .map(|row| PieSlice {
            name: cell(row, x_col).label_or(UNKNOWN_CATEGORY),
            value: cell(row, &axis.data_column).number_or(0.0),
        })
        .collect();

    let names: Vec<&str> = chart_data.iter().map(|slice| slice.name.as_str()).collect();
    let stack_colors = ColorPalette::category10().assign_colors(&names);

    Ok(PieChartProps {
        title: dto.config.title.clone(),
        chart_data,
        stack_colors,
        usd_format: view.value_symbol == "$",
        show_legend: true,
        display: options.clone(),
    })
}

pub fn map_scatter(dto: &ChartDto, view: &ResolvedView, options: &RenderOptions) -> MapperResult<ScatterChartProps> {
    let axis = value_axis(dto)?;
    let x_col = dto.config.x_axis.data_column.as_str();

    let chart_data = view
        .data
        .iter()
        .map(|row| (cell(row, x_col).number_or(0.0), cell(row, &axis.data_column).number_or(0.0)))
        .collect();

    Ok(ScatterChartProps {
        title: dto.config.title.clone(),
        chart_data,
        value_symbol: view.value_symbol.clone(),
        display: options.clone(),
    })
}

/// Tables pass the raw rows through with inferred column headers.
pub fn map_table(dto: &ChartDto) -> TableProps {
    TableProps {
        title: dto.config.title.clone(),
        description: dto.config.description.clone(),
        columns: table_columns(dto),
        rows: dto.data.clone(),
    }
}

/// The x column first, then one column per declared y-axis. Without y-axes,
/// every other column seen in the data, in first-appearance order.
fn table_columns(dto: &ChartDto) -> Vec<TableColumn> {
    let x_axis = &dto.config.x_axis;
    let mut columns = Vec::new();

    if !x_axis.data_column.is_empty() {
        columns.push(TableColumn {
            key: x_axis.data_column.clone(),
            header: non_empty_or(&x_axis.label, "Category"),
            unit: None,
        });
    }

    let y_columns: Vec<TableColumn> = dto
        .config
        .series_axes()
        .into_iter()
        .filter(|axis| !axis.data_column.is_empty())
        .map(|axis| TableColumn {
            key: axis.data_column.clone(),
            header: non_empty_or(&axis.label, "Value"),
            unit: axis.unit,
        })
        .collect();

    if y_columns.is_empty() {
        columns.extend(
            column_union(&dto.data)
                .into_iter()
                .filter(|key| *key != x_axis.data_column)
                .map(|key| TableColumn {
                    header: humanize_header(&key),
                    key,
                    unit: None,
                }),
        );
    } else {
        columns.extend(y_columns);
    }

    columns
}

/// `total_fees-usd` → `Total Fees Usd`.
pub fn humanize_header(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for ch in key.chars() {
        let ch = if ch == '_' || ch == '-' { ' ' } else { ch };
        let is_word = ch.is_ascii_alphanumeric();
        if is_word && at_word_start {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !is_word;
    }
    out
}

fn non_empty_or(label: &str, fallback: &str) -> String {
    let text = if label.is_empty() { fallback } else { label };
    text.to_string()
}

fn require_y_axis(dto: &ChartDto) -> MapperResult<()> {
    match dto.config.primary_y_axis() {
        Some(_) => Ok(()),
        None => Err(ConfigurationError::MissingYAxis {
            chart_type: dto.config.chart_type.clone(),
        }),
    }
}

/// The config's primary y-axis. A view changes the rows, never the column read.
fn value_axis(dto: &ChartDto) -> MapperResult<&AxisSpec> {
    dto.config.primary_y_axis().ok_or_else(|| ConfigurationError::MissingYAxis {
        chart_type: dto.config.chart_type.clone(),
    })
}

fn label_values(row: &Row, axes: &[&AxisSpec]) -> IndexMap<String, f64> {
    axes.iter()
        .map(|axis| (axis.label.clone(), cell(row, &axis.data_column).number_or(0.0)))
        .collect()
}

fn axis_colors(palette: ColorPalette, axes: &[&AxisSpec]) -> IndexMap<String, String> {
    palette.assign_with_overrides(axes.iter().map(|a| (a.label.as_str(), a.color.as_deref())))
}

/// Unix seconds for the row's x value; 0 when it is not a date.
fn timestamp(row: &Row, x_col: &str) -> i64 {
    let value = cell(row, x_col);
    value.unix_seconds().unwrap_or_else(|| {
        debug!(column = x_col, value = %value, "x value is not a date, using 0");
        0
    })
}
