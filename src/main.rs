use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use snapcheck::cli::{Cli, Commands};
use snapcheck::commands::{run_accept, run_init, run_list, run_run};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let exit_code = match &cli.command {
        Commands::Run(args) => run_run(args, &cli),
        Commands::Init(args) => run_init(args),
        Commands::Accept(args) => run_accept(args, &cli),
        Commands::List => run_list(&cli),
    };

    std::process::exit(exit_code);
}

/// Log to stderr. `RUST_LOG` overrides the level chosen by `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},tokio_postgres=warn")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
