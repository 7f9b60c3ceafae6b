use chrono::Local;
use clap::Parser;
use gorilla_scrape::{
    config::{Args, RunConfig},
    info_time,
    process::process_run,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let config = RunConfig::from_args(Args::parse()).await?;
    process_run(&config).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}
