use thiserror::Error;

use crate::config::ChartType;

pub type MapperResult<T> = Result<T, ConfigurationError>;

/// A chart configuration that cannot be mapped to its chart family.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("missing yAxis config: {chart_type} charts require at least one y-axis")]
    MissingYAxis { chart_type: ChartType },

    #[error("{chart_type} charts require at least {required} yAxes, found {found}")]
    InsufficientYAxes {
        chart_type: ChartType,
        required: usize,
        found: usize,
    },
}
