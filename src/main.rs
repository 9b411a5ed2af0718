use clap::Parser;
use tidydate::cli::{Cli, run_cli};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run_cli(&cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
