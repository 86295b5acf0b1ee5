// Stateful chart instance: active view selection and memoized dispatch

use std::sync::Arc;

use tracing::debug;

use crate::config::{ChartDto, ViewSpec};
use crate::ir::ChartOutput;
use crate::runtime::dispatch_with_options;
use crate::RenderOptions;

/// One mounted chart. Holds the input, the selected view and the last output.
///
/// The output is recomputed only when the DTO is replaced by a different
/// allocation or the active view changes.
#[derive(Debug)]
pub struct ChartSession {
    dto: Arc<ChartDto>,
    active_view: Option<String>,
    options: RenderOptions,
    cache: Option<(Option<String>, ChartOutput)>,
}

impl ChartSession {
    /// Start a session on the config's default view.
    pub fn new(dto: Arc<ChartDto>) -> Self {
        Self::with_options(dto, RenderOptions::default())
    }

    pub fn with_options(dto: Arc<ChartDto>, options: RenderOptions) -> Self {
        let active_view = dto.config.default_view.clone();
        Self {
            dto,
            active_view,
            options,
            cache: None,
        }
    }

    pub fn dto(&self) -> &Arc<ChartDto> {
        &self.dto
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replace the input. The same `Arc` keeps the cached output.
    pub fn set_dto(&mut self, dto: Arc<ChartDto>) {
        if Arc::ptr_eq(&self.dto, &dto) {
            return;
        }
        debug!(chart_id = %dto.config.id, "chart input replaced");
        self.dto = dto;
        self.cache = None;
    }

    pub fn active_view(&self) -> Option<&str> {
        self.active_view.as_deref()
    }

    pub fn select_view(&mut self, view_id: impl Into<String>) {
        let view_id = view_id.into();
        debug!(chart_id = %self.dto.config.id, view_id = %view_id, "view selected");
        self.active_view = Some(view_id);
    }

    /// Views offered to the user. A single view is not a choice, so it yields none.
    pub fn view_options(&self) -> &[ViewSpec] {
        match self.dto.config.views() {
            views if views.len() > 1 => views,
            _ => &[],
        }
    }

    /// Whether `output()` would return the cached result.
    pub fn is_cached(&self) -> bool {
        matches!(&self.cache, Some((view, _)) if *view == self.active_view)
    }

    /// The current output, dispatched on first use and after any change.
    pub fn output(&mut self) -> &ChartOutput {
        if !self.is_cached() {
            self.cache = None;
        }
        let (_, output) = self.cache.get_or_insert_with(|| {
            let output = dispatch_with_options(&self.dto, self.active_view.as_deref(), &self.options);
            (self.active_view.clone(), output)
        });
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisSpec, ChartConfig, ChartType, Unit};
    use crate::data::{Row, Value};

    fn rows() -> Vec<Row> {
        [100.0, 150.0]
            .iter()
            .map(|fees| [("fees".to_string(), Value::from(*fees))].into_iter().collect())
            .collect()
    }

    fn view(id: &str, unit: Unit) -> ViewSpec {
        ViewSpec {
            view_id: id.to_string(),
            y_axis: AxisSpec::new("fees", id).with_unit(unit),
        }
    }

    fn dto(views: Vec<ViewSpec>, default_view: Option<&str>) -> Arc<ChartDto> {
        Arc::new(ChartDto::new(
            rows(),
            ChartConfig {
                id: "s1".to_string(),
                chart_type: ChartType::Bar,
                x_axis: AxisSpec::new("date", "Date"),
                y_axis: Some(AxisSpec::new("fees", "Fees")),
                default_view: default_view.map(str::to_string),
                available_views: Some(views),
                ..Default::default()
            },
        ))
    }

    fn symbol(output: &ChartOutput) -> &str {
        match output {
            ChartOutput::Bar(props) => &props.value_symbol,
            other => panic!("expected bar, got {}", other.kind()),
        }
    }

    #[test]
    fn test_starts_on_default_view() {
        let session = ChartSession::new(dto(vec![view("absolute", Unit::Currency)], Some("absolute")));
        assert_eq!(session.active_view(), Some("absolute"));

        let session = ChartSession::new(dto(vec![], None));
        assert_eq!(session.active_view(), None);
    }

    #[test]
    fn test_view_options_need_two_views() {
        let single = ChartSession::new(dto(vec![view("absolute", Unit::Currency)], None));
        assert!(single.view_options().is_empty());

        let both = ChartSession::new(dto(
            vec![view("absolute", Unit::Currency), view("fees-percentage", Unit::Percent)],
            None,
        ));
        let ids: Vec<&str> = both.view_options().iter().map(|v| v.view_id.as_str()).collect();
        assert_eq!(ids, vec!["absolute", "fees-percentage"]);
    }

    #[test]
    fn test_output_is_memoized() {
        let input = dto(
            vec![view("absolute", Unit::Currency), view("fees-percentage", Unit::Percent)],
            Some("absolute"),
        );
        let mut session = ChartSession::new(Arc::clone(&input));
        assert!(!session.is_cached());
        assert_eq!(symbol(session.output()), "$");
        assert!(session.is_cached());

        // same allocation keeps the cache
        session.set_dto(Arc::clone(&input));
        assert!(session.is_cached());

        session.select_view("fees-percentage");
        assert!(!session.is_cached());
        assert_eq!(symbol(session.output()), "%");
        assert!(session.is_cached());

        // equal contents in a new allocation still recompute
        session.set_dto(Arc::new((*input).clone()));
        assert!(!session.is_cached());
        assert_eq!(symbol(session.output()), "%");
    }

    #[test]
    fn test_options_reach_output() {
        let options = RenderOptions {
            hide_data_zoom: true,
            ..Default::default()
        };
        let mut session = ChartSession::with_options(dto(vec![], None), options);
        match session.output() {
            ChartOutput::Bar(props) => assert!(props.display.hide_data_zoom),
            other => panic!("expected bar, got {}", other.kind()),
        }
    }
}
