//! CLI entry point for chunked tile world generation

use clap::Parser;
use towerwfc::io::cli::{Cli, WorldRunner};
use towerwfc::io::logging::init_logging;

fn main() -> towerwfc::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    WorldRunner::new(cli).run()
}
