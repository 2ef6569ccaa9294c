use forkchain::cli::run_cli;

fn main() -> anyhow::Result<()> {
    // Logging is initialized inside run_cli once the config is known
    run_cli()?;

    Ok(())
}
