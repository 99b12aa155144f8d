// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Serves a folder of Markdown spec documents over HTTP at
//! `http://127.0.0.1:<port>/api/specs`, with live-update events on `/ws`.

use std::error::Error;

use tracing::info;

const DEFAULT_HTTP_PORT: u16 = 3001;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<spec-dir>] [--port <port>]\n  {program} [--specs <dir>] [--port <port>]\n\nServes the spec folder over HTTP at `http://127.0.0.1:<port>/api/specs`\nand broadcasts live-update events on `/ws`.\n--port selects the port (default {DEFAULT_HTTP_PORT}).\n\nIf spec-dir/--specs is omitted, `./specs` is used and created if missing."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    spec_dir: Option<String>,
    port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--specs" => {
                if options.spec_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.spec_dir = Some(dir);
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.spec_dir.is_some() {
                    return Err(());
                }
                options.spec_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "proteus=info".into()),
            )
            .init();

        let dir = options.spec_dir.unwrap_or_else(|| "specs".to_owned());
        let port = options.port.unwrap_or(DEFAULT_HTTP_PORT);

        let folder = proteus::store::SpecFolder::new(dir);
        folder.ensure_root()?;

        let state = proteus::server::AppState::new(folder);
        proteus::server::watch::spawn_watcher(state.clone())?;
        let router = proteus::server::app(state);

        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
            let addr = listener.local_addr()?;
            info!(%addr, "serving specs");
            axum::serve(listener, router).await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}
