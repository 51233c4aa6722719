use anyhow::Result;
use clap::Parser;

use scan_image::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let code = cli.run()?;
    std::process::exit(code);
}
