use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, ValueHint};

use crate::router::ControlId;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fitness-tracker analytics dashboard", long_about = None)]
pub struct Cli {
    /// Activity file to load (.csv or .parquet)
    #[arg(
        env = "FITNESS_DASH_DATA",
        default_value = "data.csv",
        value_hint = ValueHint::FilePath
    )]
    pub data: PathBuf,

    /// Write the CSV export to this path and exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub export: Option<PathBuf>,

    /// Print one chart as JSON and exit, e.g. `cohort=Personal Data` or `bubble`
    #[arg(long, value_name = "CONTROL[=VALUE]")]
    pub chart: Option<String>,

    /// Pretty-print `--chart` output
    #[arg(long, action = ArgAction::SetTrue)]
    pub pretty: bool,

    /// Initial window width
    #[arg(long, default_value_t = 1400.0)]
    pub width: f32,

    /// Initial window height
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

/// Split a `--chart` argument into its control and value.
pub fn parse_chart_request(arg: &str) -> Result<(ControlId, String)> {
    let (control, value) = arg.split_once('=').unwrap_or((arg, ""));
    let control: ControlId = control.trim().parse().map_err(|e: String| anyhow!(e))?;
    Ok((control, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_request_splits_on_first_equals() {
        let (control, value) = parse_chart_request("cohort=Personal Data").unwrap();
        assert_eq!(control, ControlId::Cohort);
        assert_eq!(value, "Personal Data");

        let (control, value) = parse_chart_request("bubble").unwrap();
        assert_eq!(control, ControlId::Bubble);
        assert_eq!(value, "");

        assert!(parse_chart_request("table=1").is_err());
    }

    #[test]
    fn defaults_apply_without_arguments() {
        let cli = Cli::try_parse_from(["fitness-dash"]).unwrap();
        assert!(cli.export.is_none());
        assert_eq!(cli.width, 1400.0);
    }

    #[test]
    fn accepts_headless_flags() {
        let cli = Cli::try_parse_from([
            "fitness-dash",
            "activity.parquet",
            "--export",
            "out.csv",
            "--chart",
            "column=Total Steps",
        ])
        .unwrap();
        assert_eq!(cli.data, PathBuf::from("activity.parquet"));
        assert_eq!(cli.export, Some(PathBuf::from("out.csv")));
        assert_eq!(cli.chart.as_deref(), Some("column=Total Steps"));
    }
}
