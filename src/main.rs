use clap::Parser;
use color_eyre::Result;
use informix_exporter::{
    init_errors,
    init_logging,
    run,
    Args,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    init_logging(args.log_level.as_deref())?;
    run(args).await
}
