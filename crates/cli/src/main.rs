// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use courier::Cli;

fn main() {
    courier::init_tracing();
    let cli = Cli::parse();
    if let Err(e) = courier::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
