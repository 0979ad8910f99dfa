use clap::Parser;
use lat_cli::cli::{Cli, Commands};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version also land here; only real argument errors
            // take the failure exit code.
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let result = match &cli.command {
        Commands::Sim(args) => lat_cli::commands::sim::run(args),
        Commands::Validate(args) => lat_cli::commands::validate::run(args),
    };
    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
