//! Sable sandbox entry point

use anyhow::Result;
use clap::Parser;

use sable_sandbox::{Cli, execute};

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}
