// Chart type dispatch: config + active view -> renderer output

use tracing::{debug, warn};

use crate::config::{ChartDto, ChartType};
use crate::error::MapperResult;
use crate::ir::{ChartOutput, UnsupportedChart};
use crate::mapper;
use crate::resolve::resolve_view;
use crate::RenderOptions;

/// Render a chart with default display options.
pub fn dispatch(dto: &ChartDto, active_view: Option<&str>) -> ChartOutput {
    dispatch_with_options(dto, active_view, &RenderOptions::default())
}

/// Resolve the active view and route to the mapper for the declared chart type.
///
/// Never fails: configuration errors become `ChartOutput::Error` and unknown
/// chart types become a raw-data preview.
pub fn dispatch_with_options(dto: &ChartDto, active_view: Option<&str>, options: &RenderOptions) -> ChartOutput {
    let chart_type = &dto.config.chart_type;
    debug!(
        chart_id = %dto.config.id,
        chart_type = %chart_type,
        view = active_view.unwrap_or(""),
        rows = dto.data.len(),
        "dispatching chart"
    );

    match render(dto, active_view, options) {
        Ok(output) => output,
        Err(err) => {
            warn!(chart_id = %dto.config.id, chart_type = %chart_type, error = %err, "chart configuration error");
            ChartOutput::Error(err)
        }
    }
}

fn render(dto: &ChartDto, active_view: Option<&str>, options: &RenderOptions) -> MapperResult<ChartOutput> {
    let output = match &dto.config.chart_type {
        ChartType::Line | ChartType::Area | ChartType::StackedArea => {
            let view = resolve_view(dto, active_view);
            ChartOutput::Area(mapper::map_area(dto, &view, options)?)
        }
        ChartType::Bar | ChartType::StackedBar => {
            let view = resolve_view(dto, active_view);
            ChartOutput::Bar(mapper::map_bar(dto, &view, options)?)
        }
        ChartType::ClusteredBar => {
            let view = resolve_view(dto, active_view);
            ChartOutput::ClusteredBar(mapper::map_clustered_bar(dto, &view, options)?)
        }
        ChartType::MultiAxis | ChartType::Mixed => ChartOutput::Mixed(mapper::map_mixed(dto, options)?),
        ChartType::Comparison if dto.config.y_axes().len() > 1 => {
            ChartOutput::Mixed(mapper::map_mixed(dto, options)?)
        }
        ChartType::Comparison => {
            let view = resolve_view(dto, active_view);
            ChartOutput::Bar(mapper::map_bar(dto, &view, options)?)
        }
        ChartType::Pie => {
            let view = resolve_view(dto, active_view);
            ChartOutput::Pie(mapper::map_pie(dto, &view, options)?)
        }
        ChartType::Scatter => {
            let view = resolve_view(dto, active_view);
            ChartOutput::Scatter(mapper::map_scatter(dto, &view, options)?)
        }
        ChartType::Table => ChartOutput::Table(mapper::map_table(dto)),
        ChartType::None => ChartOutput::Hidden,
        ChartType::Other(name) => {
            debug!(chart_id = %dto.config.id, chart_type = %name, "no mapper for chart type, showing raw data");
            ChartOutput::Unsupported(UnsupportedChart {
                chart_type: name.clone(),
                preview: serde_json::to_value(dto).unwrap_or(serde_json::Value::Null),
            })
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisSpec, ChartConfig, Unit, ViewSpec};
    use crate::data::{Row, Value};
    use crate::error::ConfigurationError;
    use crate::ir::AreaChartData;

    fn rows() -> Vec<Row> {
        [("2024-01-01", 100.0, 4.0), ("2024-01-02", 150.0, 5.0)]
            .iter()
            .map(|(date, fees, users)| {
                [
                    ("date".to_string(), Value::from(*date)),
                    ("fees".to_string(), Value::from(*fees)),
                    ("users".to_string(), Value::from(*users)),
                ]
                .into_iter()
                .collect()
            })
            .collect()
    }

    fn dto(chart_type: &str, y_axes: Vec<AxisSpec>) -> ChartDto {
        ChartDto::new(
            rows(),
            ChartConfig {
                id: "test".to_string(),
                chart_type: ChartType::from(chart_type),
                title: "Test".to_string(),
                x_axis: AxisSpec::new("date", "Date"),
                y_axes: Some(y_axes),
                ..Default::default()
            },
        )
    }

    fn one_axis() -> Vec<AxisSpec> {
        vec![AxisSpec::new("fees", "Fees")]
    }

    fn two_axes() -> Vec<AxisSpec> {
        vec![AxisSpec::new("fees", "Fees"), AxisSpec::new("users", "Users")]
    }

    #[test]
    fn test_dispatch_kinds() {
        let cases = [
            ("line", "area"),
            ("area", "area"),
            ("stacked-area", "area"),
            ("bar", "bar"),
            ("stacked-bar", "bar"),
            ("clustered-bar", "clustered-bar"),
            ("pie", "pie"),
            ("scatter", "scatter"),
            ("table", "table"),
            ("none", "none"),
            ("sankey", "unsupported"),
        ];
        for (chart_type, kind) in cases {
            let output = dispatch(&dto(chart_type, one_axis()), None);
            assert_eq!(output.kind(), kind, "chart type {}", chart_type);
        }
    }

    #[test]
    fn test_dual_axis_kinds() {
        for chart_type in ["multi-axis", "mixed", "comparison"] {
            let output = dispatch(&dto(chart_type, two_axes()), None);
            assert_eq!(output.kind(), "mixed", "chart type {}", chart_type);
        }
    }

    #[test]
    fn test_comparison_with_one_axis_is_bar() {
        let output = dispatch(&dto("comparison", one_axis()), None);
        assert_eq!(output.kind(), "bar");
    }

    #[test]
    fn test_mixed_with_one_axis_is_error() {
        let output = dispatch(&dto("multi-axis", one_axis()), None);
        assert_eq!(
            output,
            ChartOutput::Error(ConfigurationError::InsufficientYAxes {
                chart_type: ChartType::MultiAxis,
                required: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_missing_y_axis_is_error_except_table_and_none() {
        for chart_type in ["line", "area", "stacked-area", "bar", "stacked-bar", "clustered-bar", "pie", "scatter"] {
            let output = dispatch(&dto(chart_type, vec![]), None);
            assert!(output.is_error(), "chart type {} should error", chart_type);
        }
        assert_eq!(dispatch(&dto("table", vec![]), None).kind(), "table");
        assert_eq!(dispatch(&dto("none", vec![]), None).kind(), "none");
    }

    #[test]
    fn test_unsupported_keeps_name_and_preview() {
        let output = dispatch(&dto("sankey", one_axis()), None);
        let ChartOutput::Unsupported(chart) = output else {
            panic!("expected unsupported");
        };
        assert_eq!(chart.chart_type, "sankey");
        assert_eq!(chart.preview["config"]["chartType"], "sankey");
        assert_eq!(chart.preview["data"][1]["fees"], 150.0);
    }

    #[test]
    fn test_active_view_flows_through() {
        let mut dto = dto("line", one_axis());
        dto.config.available_views = Some(vec![ViewSpec {
            view_id: "fees-percentage".to_string(),
            y_axis: AxisSpec::new("fees", "Fees change").with_unit(Unit::Percent),
        }]);

        let ChartOutput::Area(props) = dispatch(&dto, Some("fees-percentage")) else {
            panic!("expected area");
        };
        assert_eq!(props.value_symbol, "%");
        assert_eq!(props.chart_data, AreaChartData::Points(vec![(1_704_067_200, 0.0), (1_704_153_600, 50.0)]));

        let ChartOutput::Area(raw) = dispatch(&dto, None) else {
            panic!("expected area");
        };
        assert_eq!(raw.value_symbol, "$");
    }

    #[test]
    fn test_options_pass_through() {
        let options = RenderOptions {
            height: "250px".to_string(),
            ..Default::default()
        };
        let ChartOutput::Bar(props) = dispatch_with_options(&dto("bar", one_axis()), None, &options) else {
            panic!("expected bar");
        };
        assert_eq!(props.display.height, "250px");
    }
}
