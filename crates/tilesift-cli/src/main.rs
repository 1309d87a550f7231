use clap::Parser;
use tilesift_cli::{Cli, CliError, logging, summary_line};
use tilesift_pipeline::{CancelToken, PatchPipeline};

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.build_config()?;
    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    logging::init(cli.verbose)?;
    tracing::debug!(?config, "effective configuration");
    let sample_id = config.sample_id.clone();
    let pipeline = PatchPipeline::new(config)?;
    let summary = pipeline.run(&CancelToken::new())?;
    println!("{}", summary_line(&sample_id, &summary));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
