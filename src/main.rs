use clap::Parser;
use tracing_subscriber::EnvFilter;

use lsp_shim::app;
use lsp_shim::cli::Cli;

fn main() {
    let config = match Cli::try_parse() {
        Ok(cli) => cli.into_config(),
        Err(e) => {
            let _ = e.print();
            // Usage errors exit 1; --help and --version exit 0.
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // stdout carries the protocol, so logs go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let code = match runtime.block_on(app::run(config)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    };

    // A pending stdin read holds a blocking thread; don't wait for it.
    runtime.shutdown_background();
    std::process::exit(code);
}
