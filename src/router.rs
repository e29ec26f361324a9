use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::charts::pie::PieTarget;
use crate::charts::{histogram, line, ChartSpec};
use crate::dashboard::Dashboard;
use crate::data::cohort::Cohort;
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// User-facing controls that drive a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlId {
    /// Cohort radio buttons → line chart.
    Cohort,
    /// Column dropdown → histogram.
    Column,
    /// Pie target toggle → pie chart.
    PieTarget,
    /// Static animated scatter; ignores its value.
    Bubble,
}

impl ControlId {
    pub const ALL: [ControlId; 4] = [
        ControlId::Cohort,
        ControlId::Column,
        ControlId::PieTarget,
        ControlId::Bubble,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ControlId::Cohort => "cohort",
            ControlId::Column => "column",
            ControlId::PieTarget => "pie",
            ControlId::Bubble => "bubble",
        }
    }

    /// Title used for the placeholder when a render fails.
    fn chart_title(self) -> &'static str {
        match self {
            ControlId::Cohort => "Line Plot",
            ControlId::Column => "Histogram",
            ControlId::PieTarget => "Distribution of Workout Minutes",
            ControlId::Bubble => "Daily Steps vs Distance",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlId::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ControlId::ALL.iter().map(|c| c.name()).collect();
                format!("unknown control '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

// ---------------------------------------------------------------------------
// Dispatch table
// ---------------------------------------------------------------------------

pub type Handler = fn(&Dashboard, &str) -> Result<ChartSpec, ChartError>;

/// Maps each control to the builder it drives. Stateless: every call is
/// independent and returns a fresh spec.
pub struct SelectionRouter {
    routes: BTreeMap<ControlId, Handler>,
}

impl Default for SelectionRouter {
    fn default() -> Self {
        let mut routes: BTreeMap<ControlId, Handler> = BTreeMap::new();
        routes.insert(ControlId::Cohort, route_cohort);
        routes.insert(ControlId::Column, route_column);
        routes.insert(ControlId::PieTarget, route_pie);
        routes.insert(ControlId::Bubble, route_bubble);
        Self { routes }
    }
}

impl SelectionRouter {
    /// Invoke the handler registered for `control` and propagate its error.
    pub fn dispatch(
        &self,
        dashboard: &Dashboard,
        control: ControlId,
        value: &str,
    ) -> Result<ChartSpec, ChartError> {
        log::debug!("dispatch {control}={value:?}");
        let handler = self
            .routes
            .get(&control)
            .ok_or_else(|| unknown_selection(control, value))?;
        handler(dashboard, value)
    }

    /// Like [`dispatch`](Self::dispatch), but a failure becomes a placeholder
    /// spec so one broken chart never takes the dashboard down.
    pub fn render(&self, dashboard: &Dashboard, control: ControlId, value: &str) -> ChartSpec {
        self.dispatch(dashboard, control, value)
            .unwrap_or_else(|err| {
                log::warn!("{control} chart fell back to placeholder: {err}");
                ChartSpec::placeholder(control.chart_title(), err.to_string())
            })
    }
}

fn unknown_selection(control: ControlId, value: &str) -> ChartError {
    ChartError::UnknownSelection {
        control: control.to_string(),
        value: value.to_string(),
    }
}

fn route_cohort(dashboard: &Dashboard, value: &str) -> Result<ChartSpec, ChartError> {
    let cohort: Cohort = value
        .parse()
        .map_err(|_| unknown_selection(ControlId::Cohort, value))?;
    Ok(line::build(
        &dashboard.dataset,
        dashboard.partition.indices(cohort),
    ))
}

fn route_column(dashboard: &Dashboard, value: &str) -> Result<ChartSpec, ChartError> {
    histogram::build(&dashboard.dataset, value)
}

fn route_pie(dashboard: &Dashboard, value: &str) -> Result<ChartSpec, ChartError> {
    let target: PieTarget = value
        .parse()
        .map_err(|_| unknown_selection(ControlId::PieTarget, value))?;
    Ok(dashboard.pie(target).clone())
}

fn route_bubble(dashboard: &Dashboard, _value: &str) -> Result<ChartSpec, ChartError> {
    Ok(dashboard.bubble().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartBody;
    use crate::data::model::{FitnessDataset, Record};
    use chrono::NaiveDate;

    fn dashboard() -> Dashboard {
        let records = (1..=12)
            .map(|id| Record {
                id,
                activity_date: NaiveDate::from_ymd_opt(2016, 4, 12).unwrap(),
                total_steps: 1000.0 * id as f64,
                total_distance: 0.5 * id as f64,
                calories: 1500.0,
                very_active_minutes: 30.0,
                fairly_active_minutes: 10.0,
                lightly_active_minutes: 60.0,
                cells: Vec::new(),
            })
            .collect();
        Dashboard::new(FitnessDataset::from_records(Vec::new(), records))
    }

    #[test]
    fn cohort_selection_builds_line_chart() {
        let d = dashboard();
        let router = SelectionRouter::default();
        let spec = router
            .dispatch(&d, ControlId::Cohort, "Fitbit Users 1-10")
            .unwrap();
        match spec.body {
            ChartBody::Line { series } => assert_eq!(series.len(), 10),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn empty_cohort_is_not_an_error() {
        let d = dashboard();
        let spec = SelectionRouter::default()
            .dispatch(&d, ControlId::Cohort, "Fitbit Users 21-30")
            .unwrap();
        assert_eq!(spec.body, ChartBody::Line { series: Vec::new() });
    }

    #[test]
    fn unknown_column_propagates_from_dispatch() {
        let d = dashboard();
        let err = SelectionRouter::default()
            .dispatch(&d, ControlId::Column, "Heart Rate")
            .unwrap_err();
        assert_eq!(err, ChartError::UnknownColumn("Heart Rate".into()));
    }

    #[test]
    fn render_falls_back_to_placeholder() {
        let d = dashboard();
        let router = SelectionRouter::default();

        let spec = router.render(&d, ControlId::Cohort, "Fitbit User Data");
        assert!(spec.is_placeholder());
        assert_eq!(spec.title, "Line Plot");

        let spec = router.render(&d, ControlId::PieTarget, "everyone");
        assert!(spec.is_placeholder());
    }

    #[test]
    fn pie_toggle_returns_precomputed_spec() {
        let d = dashboard();
        let router = SelectionRouter::default();
        for target in PieTarget::ALL {
            let spec = router.render(&d, ControlId::PieTarget, target.value());
            assert_eq!(&spec, d.pie(target));
        }
    }

    #[test]
    fn repeated_dispatch_is_idempotent() {
        let d = dashboard();
        let router = SelectionRouter::default();
        let a = router.render(&d, ControlId::Column, "Total Steps");
        let b = router.render(&d, ControlId::Column, "Total Steps");
        assert_eq!(a, b);
    }

    #[test]
    fn control_names_round_trip() {
        for control in ControlId::ALL {
            assert_eq!(control.name().parse::<ControlId>(), Ok(control));
        }
        assert!("table".parse::<ControlId>().is_err());
    }
}
