use crate::charts::pie::PieTarget;
use crate::charts::{ChartBody, ChartSpec};
use crate::dashboard::Dashboard;
use crate::data::cohort::Cohort;
use crate::data::model::Measurement;
use crate::data::table::TableView;
use crate::error::ExportError;
use crate::export::{export_csv, ExportBlob};
use crate::router::{ControlId, SelectionRouter};

/// Seconds between bubble-chart frames while playing.
pub const FRAME_INTERVAL_SECS: f64 = 0.5;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Playback position of the bubble chart.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    pub frame: usize,
    pub playing: bool,
    last_step: Option<f64>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded data and the charts derived from it once.
    pub dashboard: Dashboard,
    router: SelectionRouter,

    /// Current control values.
    pub cohort: Cohort,
    pub column: Measurement,
    pub pie_target: PieTarget,

    /// Specs for the current selection.
    pub line_chart: ChartSpec,
    pub histogram: ChartSpec,
    pub pie_chart: ChartSpec,
    pub bubble_chart: ChartSpec,

    pub table_view: TableView,
    pub animation: Animation,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let router = SelectionRouter::default();
        let cohort = Cohort::SELECTOR_OPTIONS[0];
        let column = Measurement::TotalSteps;
        let pie_target = PieTarget::Fitbit;

        let line_chart = router.render(&dashboard, ControlId::Cohort, &cohort.label());
        let histogram = router.render(&dashboard, ControlId::Column, column.column_name());
        let pie_chart = router.render(&dashboard, ControlId::PieTarget, pie_target.value());
        let bubble_chart = router.render(&dashboard, ControlId::Bubble, "");
        let table_view = TableView::new(dashboard.table());

        Self {
            dashboard,
            router,
            cohort,
            column,
            pie_target,
            line_chart,
            histogram,
            pie_chart,
            bubble_chart,
            table_view,
            animation: Animation::default(),
            status_message: None,
        }
    }

    pub fn select_cohort(&mut self, cohort: Cohort) {
        self.cohort = cohort;
        self.line_chart = self
            .router
            .render(&self.dashboard, ControlId::Cohort, &cohort.label());
    }

    pub fn select_column(&mut self, column: Measurement) {
        self.column = column;
        self.histogram =
            self.router
                .render(&self.dashboard, ControlId::Column, column.column_name());
    }

    pub fn select_pie_target(&mut self, target: PieTarget) {
        self.pie_target = target;
        self.pie_chart = self
            .router
            .render(&self.dashboard, ControlId::PieTarget, target.value());
    }

    /// Click on a table header.
    pub fn toggle_sort(&mut self, column: usize) {
        self.table_view.toggle_sort(self.dashboard.table(), column);
    }

    pub fn export_blob(&self) -> Result<ExportBlob, ExportError> {
        export_csv(self.dashboard.table())
    }

    pub fn frame_count(&self) -> usize {
        match &self.bubble_chart.body {
            ChartBody::Bubble { frames, .. } => frames.len(),
            _ => 0,
        }
    }

    pub fn toggle_playback(&mut self) {
        self.animation.playing = !self.animation.playing;
        self.animation.last_step = None;
        if self.animation.playing && self.animation.frame + 1 >= self.frame_count() {
            self.animation.frame = 0;
        }
    }

    /// Step the bubble animation at time `now` (seconds). Returns whether the
    /// frame changed; playback stops on the last frame.
    pub fn advance_animation(&mut self, now: f64) -> bool {
        if !self.animation.playing {
            return false;
        }
        let last = *self.animation.last_step.get_or_insert(now);
        if now - last < FRAME_INTERVAL_SECS {
            return false;
        }
        self.animation.last_step = Some(now);

        if self.animation.frame + 1 < self.frame_count() {
            self.animation.frame += 1;
            true
        } else {
            self.animation.playing = false;
            false
        }
    }
}
