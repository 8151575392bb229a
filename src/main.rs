//! Collagen command-line generator

use clgn::cli::Cli;
use std::process;

fn main() {
    if let Err(e) = Cli::new().run() {
        eprintln!("error[{}]: {}", e.kind(), e);
        process::exit(1);
    }
}
