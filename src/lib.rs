// Library exports for chartflow

pub mod config;
pub mod data;
pub mod error;
pub mod mapper;
pub mod palette;
pub mod runtime;
pub mod session;

// Pipeline Modules
pub mod ir;
pub mod resolve;
pub mod transform;

pub use config::{AxisSpec, ChartConfig, ChartDto, ChartType, Unit, ViewSpec};
pub use data::{Dataset, Row, Value};
pub use error::{ConfigurationError, MapperResult};
pub use ir::ChartOutput;
pub use runtime::{dispatch, dispatch_with_options};
pub use session::ChartSession;

use serde::{Deserialize, Serialize};

/// Cosmetic parameters passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default = "default_height")]
    pub height: String,
    #[serde(default)]
    pub hide_download_button: bool,
    #[serde(default)]
    pub hide_data_zoom: bool,
    #[serde(default = "default_tooltip_sort")]
    pub tooltip_sort: bool,
}

fn default_height() -> String { "400px".to_string() }
fn default_tooltip_sort() -> bool { true }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            height: default_height(),
            hide_download_button: false,
            hide_data_zoom: false,
            tooltip_sort: default_tooltip_sort(),
        }
    }
}
