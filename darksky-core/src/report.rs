//! Text rendering of a forecast report.
//!
//! Output is a two-column table (label, value) with the label column padded to
//! the widest label. Sparklines sit in the value column under their summary.

use crate::{
    Block, ForecastReport,
    color::Style,
    error::SparklineError,
    sparkline::{self, Palette},
};

const GUTTER: usize = 2;

/// Presentation choices for [`format_report`].
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub palette: Palette,
    pub style: Style,
}

/// Render `report` as text. Fails only if a series cannot be encoded.
pub fn format_report(report: &ForecastReport, opts: &ReportOptions) -> Result<String, SparklineError> {
    let symbol = report.units.temperature_symbol();
    let current = &report.currently;

    let mut rows: Vec<(&str, String)> = vec![
        ("Timezone", report.timezone.clone()),
        ("Currently", current.summary.clone()),
        (
            "Temp (AT)",
            format!(
                "{} ({})",
                fmt_temp(current.temperature, symbol),
                fmt_temp(current.apparent_temperature, symbol),
            ),
        ),
    ];
    if let Some(h) = current.humidity {
        rows.push(("Humidity", format!("{:.0}%", h * 100.0)));
    }
    if let Some(w) = current.wind_speed {
        let unit = report.units.wind_speed_unit();
        rows.push(("Wind", format!("{w:.1} {unit}").trim_end().to_string()));
    }
    push_block(&mut rows, "Hourly", &report.hourly, opts)?;
    push_block(&mut rows, "Daily", &report.daily, opts)?;

    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0) + GUTTER;

    let mut out = format!(
        "{} @ {}\n",
        report.location,
        report.local_time().format("%Y-%m-%d %H:%M:%S")
    );
    for (label, value) in rows {
        let line = format!("{label:<width$}{value}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}

fn push_block<'a>(
    rows: &mut Vec<(&'a str, String)>,
    label: &'a str,
    block: &Block,
    opts: &ReportOptions,
) -> Result<(), SparklineError> {
    rows.push((label, block.summary.clone()));

    let line = sparkline::render(&block.temperatures(), &opts.palette)?;
    if !line.is_empty() {
        rows.push(("", line.display(opts.style)));
    }
    Ok(())
}

fn fmt_temp(value: Option<f64>, symbol: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}°{symbol}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataPoint, Location, Units};
    use chrono::{DateTime, Utc};

    fn point(temperature: Option<f64>) -> DataPoint {
        DataPoint {
            time: DateTime::<Utc>::from_timestamp(1_539_700_000, 0).unwrap(),
            summary: "Clear".into(),
            temperature,
            apparent_temperature: temperature.map(|t| t - 1.0),
            humidity: None,
            wind_speed: None,
        }
    }

    fn block(summary: &str, temps: &[f64]) -> Block {
        Block {
            summary: summary.into(),
            data: temps.iter().map(|&t| point(Some(t))).collect(),
        }
    }

    fn report() -> ForecastReport {
        ForecastReport {
            location: Location { address: "Oslo, Norway".into(), lat: 59.9, lng: 10.7 },
            timezone: "Europe/Oslo".into(),
            utc_offset_hours: 2.0,
            units: Units::Si,
            currently: point(Some(12.34)),
            hourly: block("Cloudy all day.", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
            daily: block("Rain on Sunday.", &[]),
        }
    }

    #[test]
    fn plain_report_layout() {
        let text = format_report(&report(), &ReportOptions::default()).unwrap();
        let expected = "\
Oslo, Norway @ 2018-10-16 16:26:40
Timezone   Europe/Oslo
Currently  Clear
Temp (AT)  12.3°C (11.3°C)
Hourly     Cloudy all day.
           ▁▂▃▄▅▆▇ 1 7
Daily      Rain on Sunday.
";
        assert_eq!(text, expected);
    }

    #[test]
    fn humidity_and_wind_rows_follow_temperature() {
        let mut r = report();
        r.currently.humidity = Some(0.62);
        r.currently.wind_speed = Some(3.44);
        let text = format_report(&r, &ReportOptions::default()).unwrap();
        assert!(text.contains("Temp (AT)  12.3°C (11.3°C)\nHumidity   62%\nWind       3.4 m/s\nHourly"), "{text}");
    }

    #[test]
    fn wind_without_known_units_has_no_suffix() {
        let mut r = report();
        r.units = Units::Auto;
        r.currently.wind_speed = Some(5.0);
        let text = format_report(&r, &ReportOptions::default()).unwrap();
        assert!(text.contains("Wind       5.0\n"), "{text}");
        assert!(!text.contains("Humidity"));
    }

    #[test]
    fn missing_temperature_prints_placeholder() {
        let mut r = report();
        r.currently = point(None);
        let text = format_report(&r, &ReportOptions::default()).unwrap();
        assert!(text.contains("Temp (AT)  n/a (n/a)\n"));
    }

    #[test]
    fn ansi_style_colors_sparkline_only() {
        let opts = ReportOptions { palette: Palette::blocks(), style: Style::Ansi };
        let text = format_report(&report(), &opts).unwrap();
        assert!(text.contains("\x1b[31m▇\x1b[0m 1 7"));
        assert!(text.starts_with("Oslo, Norway @"));
    }

    #[test]
    fn plain_style_has_no_escapes() {
        let text = format_report(&report(), &ReportOptions::default()).unwrap();
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn ascii_palette_is_honoured() {
        let opts = ReportOptions { palette: Palette::ascii(), style: Style::Plain };
        let text = format_report(&report(), &opts).unwrap();
        assert!(text.contains("_.-=+*# 1 7"));
    }

    #[test]
    fn non_finite_sample_aborts_report() {
        let mut r = report();
        r.daily = block("Odd.", &[1.0, f64::NAN]);
        let err = format_report(&r, &ReportOptions::default()).unwrap_err();
        assert!(matches!(err, SparklineError::NonFiniteSample { index: 1, .. }));
    }
}
