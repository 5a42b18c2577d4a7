//! `orgdir` binary

use orgdir_cli::{command, exit_code, logging, run, Session};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = command().get_matches();

    match execute(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let config = Session::config(matches)?;
    logging::init(&config.log)?;

    let data = matches
        .get_one::<PathBuf>("data")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("orgdir.json"));
    let session = Session::open(config, &data)?;
    let outcome = run(&session, matches).await?;

    println!("{}", serde_json::to_string_pretty(&outcome.value)?);
    Ok(())
}
