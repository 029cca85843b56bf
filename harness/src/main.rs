use anyhow::anyhow;
use clap::Parser;
use generator::profile::build_test_signal;
use log::info;
use report::model::RunReport;
use report::plot::{render_comparison, render_spectra};
use report::table::render_table;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic pulse denoising bench")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Number of samples in the generated pulse
    #[arg(long)]
    length: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Replace every configured noise level with this value
    #[arg(long)]
    noise_level: Option<f64>,
    /// Skip writing the PNG figures
    #[arg(long, default_value_t = false)]
    no_plots: bool,
    /// Where to write the time-domain comparison figure
    #[arg(long)]
    figure: Option<PathBuf>,
    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?.with_overrides(args.length, args.seed, args.noise_level)
    } else {
        WorkflowConfig::from_args(args.length, args.seed, args.noise_level)
    };
    if args.no_plots {
        config.output.plots = false;
    }
    if let Some(figure) = args.figure {
        config.output.figure = figure;
    }
    if let Some(report) = args.report {
        config.output.report = Some(report);
    }

    let signal = build_test_signal(&config.generator)?;
    info!(
        "generated {} samples with seed {:?}",
        signal.len(),
        config.generator.seed
    );

    let result = Runner::new(config.clone()).execute(&signal)?;
    print!("{}", render_table(&result));

    if let Some(path) = &config.output.report {
        RunReport::new(&config.generator, &result).write(path)?;
        info!("run report written to {}", path.display());
    }

    if config.output.plots {
        render_comparison(
            &config.output.figure,
            &signal.clean,
            &signal.noisy,
            &result.outcomes,
        )
        .map_err(|err| anyhow!("drawing {}: {}", config.output.figure.display(), err))?;

        let mut rows: Vec<(&str, &[f64])> = vec![("noisy", signal.noisy.as_slice())];
        rows.extend(
            result
                .ranked()
                .into_iter()
                .map(|outcome| (outcome.name, outcome.output.as_slice())),
        );
        render_spectra(&config.output.spectrum_figure, &rows, &config.analysis).map_err(
            |err| {
                anyhow!(
                    "drawing {}: {}",
                    config.output.spectrum_figure.display(),
                    err
                )
            },
        )?;
        println!(
            "Figures saved to {} and {}",
            config.output.figure.display(),
            config.output.spectrum_figure.display()
        );
    }

    Ok(())
}
