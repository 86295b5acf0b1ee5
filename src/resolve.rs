use std::borrow::Cow;

use tracing::debug;

use crate::config::{ChartDto, Unit, ViewSpec};
use crate::ir::ResolvedView;
use crate::transform::{percentage_change, ratio};

/// Resolve which view is active for this render and apply its transformation.
///
/// An absent id, a config without views, or an id that matches no view all
/// fall back to the raw data and the config's primary y-axis.
pub fn resolve_view<'a>(dto: &'a ChartDto, active_view_id: Option<&str>) -> ResolvedView<'a> {
    let config = &dto.config;

    let view = match active_view_id {
        Some(id) if !config.views().is_empty() => {
            let found = config.find_view(id);
            if found.is_none() {
                debug!(chart_id = %config.id, view_id = id, "unknown view, using raw data");
            }
            found
        }
        _ => None,
    };

    let Some(view) = view else {
        let y_axis = config.primary_y_axis();
        return ResolvedView {
            data: Cow::Borrowed(&dto.data),
            value_symbol: y_axis.map_or("$", |axis| axis.value_symbol()).to_string(),
            y_axis,
            view: None,
        };
    };

    let mut data: Cow<'a, [crate::data::Row]> = Cow::Borrowed(&dto.data);

    if is_percentage_view(view) {
        debug!(view_id = %view.view_id, column = %view.y_axis.data_column, "applying percentage change");
        data = Cow::Owned(percentage_change(&data, &view.y_axis.data_column));
    }

    if is_ratio_view(view) {
        match config.y_axes() {
            [numerator, denominator, ..] => {
                debug!(
                    view_id = %view.view_id,
                    numerator = %numerator.data_column,
                    denominator = %denominator.data_column,
                    "applying ratio"
                );
                data = Cow::Owned(ratio(&data, &numerator.data_column, &denominator.data_column));
            }
            axes => {
                debug!(view_id = %view.view_id, y_axes = axes.len(), "ratio view needs two yAxes, skipping");
            }
        }
    }

    ResolvedView {
        data,
        value_symbol: view.y_axis.value_symbol().to_string(),
        y_axis: Some(&view.y_axis),
        view: Some(view),
    }
}

/// A percent-unit view whose id names it a percentage view.
///
/// Both signals must agree; either one alone leaves the data untouched.
pub fn is_percentage_view(view: &ViewSpec) -> bool {
    view.y_axis.unit == Some(Unit::Percent) && view.view_id.contains("percentage")
}

/// A ratio-unit view whose id names it a ratio view.
pub fn is_ratio_view(view: &ViewSpec) -> bool {
    view.y_axis.unit == Some(Unit::Ratio) && view.view_id.contains("ratio")
}
