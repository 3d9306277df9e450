use anyhow::Context;
use clap::Parser;
use gcodeview::cli::{format_report, report_json, run, Args};
use gcodeview::{init_logging, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_json)?;
    tracing::debug!("gcodeview {} (built {})", VERSION, BUILD_DATE);

    let report = run(&args)
        .with_context(|| format!("could not interpret file {}", args.file.display()))?;

    if args.json {
        println!("{}", report_json(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}
