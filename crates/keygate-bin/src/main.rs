// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Keygate - credential authentication gateway
//!
//! Main binary entry point.

use keygate_bin::{cli::Cli, commands, error, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    init_logging(cli.effective_log_level(), cli.log_format);

    if let Err(e) = commands::execute(cli).await {
        error::report_error_and_exit(e);
    }
}
