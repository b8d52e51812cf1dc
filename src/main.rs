use std::process;

use chiefr::{exit_code_for, Cli, USAGE_EXIT_CODE};
use clap::Parser;

fn main() {
    // RUST_LOG controls verbosity; default to warnings on stderr so reports
    // on stdout stay clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version are reported as errors that go to stdout.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            process::exit(USAGE_EXIT_CODE);
        }
    };

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(exit_code_for(&e));
    }
}
