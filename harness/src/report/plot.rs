use crate::workflow::config::AnalysisConfig;
use crate::workflow::runner::FilterOutcome;
use plotters::coord::Shift;
use plotters::prelude::*;
use pulsecore::analysis::{amplitude_spectrum, spectrogram, welch_psd};
use std::error::Error;
use std::path::Path;

const PALETTE: [RGBColor; 6] = [
    RGBColor(220, 50, 50),
    RGBColor(50, 100, 220),
    RGBColor(50, 150, 50),
    RGBColor(220, 150, 50),
    RGBColor(150, 50, 220),
    RGBColor(50, 200, 200),
];

const NOISY: RGBColor = RGBColor(190, 190, 190);

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Lowest and highest value across all series, padded by 10 %.
pub fn value_range(series: &[&[f64]]) -> (f64, f64) {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.iter())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    if hi - lo < 1e-12 {
        return (lo - 1.0, hi + 1.0);
    }
    let margin = (hi - lo) * 0.1;
    (lo - margin, hi + margin)
}

pub fn to_db(power: f64) -> f64 {
    10.0 * power.max(1e-20).log10()
}

/// Blue-to-red ramp for a value already scaled to `[0, 1]`.
pub fn heat_color(level: f64) -> HSLColor {
    let level = level.clamp(0.0, 1.0);
    HSLColor(0.66 * (1.0 - level), 0.9, 0.25 + 0.3 * level)
}

fn time_panel(
    area: &Panel,
    title: &str,
    clean: &[f64],
    overlay: &[f64],
    overlay_label: &str,
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let (y_min, y_max) = value_range(&[clean, overlay]);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..clean.len() as f64, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Sample")
        .y_desc("Amplitude")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            overlay.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            ShapeStyle::from(&color).stroke_width(1),
        ))?
        .label(overlay_label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

    chart
        .draw_series(LineSeries::new(
            clean.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            ShapeStyle::from(&BLACK).stroke_width(2),
        ))?
        .label("clean")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    Ok(())
}

/// Time-domain figure: clean against noisy on top, then one panel per filter.
pub fn render_comparison(
    path: &Path,
    clean: &[f64],
    noisy: &[f64],
    outcomes: &[FilterOutcome],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (2240, 1440)).into_drawing_area();
    root.fill(&WHITE)?;
    let (top, bottom) = root.split_vertically(480);

    time_panel(&top, "Clean pulse vs noisy observation", clean, noisy, "noisy", NOISY)?;

    let rows = outcomes.len().div_ceil(3).max(1);
    let cells = bottom.split_evenly((rows, 3));
    for (index, (outcome, cell)) in outcomes.iter().zip(cells.iter()).enumerate() {
        let title = format!(
            "{} (SNR {:.2} dB, corr {:.3})",
            outcome.name, outcome.metrics.snr_db, outcome.metrics.correlation
        );
        time_panel(
            cell,
            &title,
            clean,
            &outcome.output,
            outcome.name,
            PALETTE[index % PALETTE.len()],
        )?;
    }

    root.present()?;
    Ok(())
}

fn spectrum_panel(
    area: &Panel,
    title: &str,
    freqs_khz: &[f64],
    values: &[f64],
    y_desc: &str,
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let x_max = freqs_khz.last().copied().unwrap_or(1.0).max(1e-9);
    let (y_min, y_max) = value_range(&[values]);
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 16).into_font())
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (kHz)")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(LineSeries::new(
        freqs_khz.iter().copied().zip(values.iter().copied()),
        ShapeStyle::from(&color).stroke_width(1),
    ))?;
    Ok(())
}

fn spectrogram_panel(
    area: &Panel,
    title: &str,
    signal: &[f64],
    analysis: &AnalysisConfig,
) -> Result<(), Box<dyn Error>> {
    let grid = spectrogram(
        signal,
        analysis.sample_rate,
        analysis.spectrogram_nperseg,
        analysis.spectrogram_noverlap,
    )?;
    let duration_ms = signal.len() as f64 / analysis.sample_rate * 1e3;
    let nyquist_khz = analysis.sample_rate / 2.0 / 1e3;
    let (bins, frames) = grid.power.dim();

    let levels: Vec<f64> = grid.power.iter().map(|&p| to_db(p)).collect();
    let (lo, hi) = levels
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = (hi - lo).max(1e-9);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 16).into_font())
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..duration_ms, 0f64..nyquist_khz)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time (ms)")
        .y_desc("Frequency (kHz)")
        .draw()?;

    let frame_ms = duration_ms / frames.max(1) as f64;
    let bin_khz = nyquist_khz / bins.max(1) as f64;
    chart.draw_series((0..bins).flat_map(|row| {
        let levels = &levels;
        (0..frames).map(move |column| {
            let level = (levels[row * frames + column] - lo) / span;
            let x0 = column as f64 * frame_ms;
            let y0 = row as f64 * bin_khz;
            Rectangle::new(
                [(x0, y0), (x0 + frame_ms, y0 + bin_khz)],
                heat_color(level).filled(),
            )
        })
    }))?;
    Ok(())
}

/// Frequency figure: amplitude spectrum, Welch PSD and spectrogram per row.
pub fn render_spectra(
    path: &Path,
    rows: &[(&str, &[f64])],
    analysis: &AnalysisConfig,
) -> Result<(), Box<dyn Error>> {
    let height = (300 * rows.len().max(1)) as u32;
    let root = BitMapBackend::new(path, (1800, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let cells = root.split_evenly((rows.len().max(1), 3));

    for (index, (name, signal)) in rows.iter().enumerate() {
        let color = if index == 0 {
            RGBColor(100, 100, 100)
        } else {
            PALETTE[(index - 1) % PALETTE.len()]
        };

        let spectrum = amplitude_spectrum(signal, analysis.sample_rate, None)?;
        let khz: Vec<f64> = spectrum.freqs.iter().map(|f| f / 1e3).collect();
        spectrum_panel(
            &cells[index * 3],
            &format!("{} FFT", name),
            &khz,
            &spectrum.values,
            "Amplitude",
            color,
        )?;

        let psd = welch_psd(signal, analysis.sample_rate, analysis.psd_nperseg)?;
        let khz: Vec<f64> = psd.freqs.iter().map(|f| f / 1e3).collect();
        let db: Vec<f64> = psd.values.iter().map(|&p| to_db(p)).collect();
        spectrum_panel(
            &cells[index * 3 + 1],
            &format!("{} PSD", name),
            &khz,
            &db,
            "PSD (dB/Hz)",
            color,
        )?;

        spectrogram_panel(
            &cells[index * 3 + 2],
            &format!("{} spectrogram", name),
            signal,
            analysis,
        )?;
    }

    root.present()?;
    Ok(())
}
