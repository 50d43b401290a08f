use clap::Parser;
use tracing_subscriber::EnvFilter;

use kmer_locate::cli;

fn main() -> anyhow::Result<()> {
    // Usage errors exit with 1; help and version exit with 0
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = i32::from(e.use_stderr());
            // Nothing left to report to if stderr is gone; exit code still applies.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("kmer_locate=debug,info")
    } else {
        EnvFilter::new("kmer_locate=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    cli::locate::run(cli.locate, cli.format)?;

    Ok(())
}
