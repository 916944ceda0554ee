// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result};
use config::Config;
use invoicedesk_api::Client;
use invoicedesk_app::{RowService, RowViewController};
use invoicedesk_testkit::MemoryRowService;
use std::env;
use std::path::PathBuf;
use tracing::info;

const DEMO_SEED: u64 = 2026;
const DEMO_ACTIVE_ROWS: usize = 40;
const DEMO_ARCHIVED_ROWS: usize = 25;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `invoicedesk --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    if options.demo {
        if options.check_only {
            return Ok(());
        }
        let service = MemoryRowService::seeded(DEMO_SEED, DEMO_ACTIVE_ROWS, DEMO_ARCHIVED_ROWS);
        return launch(service, &config, "demo");
    }

    let client = Client::new(config.base_url(), config.timeout()?).with_context(|| {
        format!(
            "invalid [server] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        client.ping()?;
        println!("{} answered", client.base_url());
        return Ok(());
    }

    let source = client.base_url().to_owned();
    launch(client, &config, &source)
}

fn launch<S: RowService>(service: S, config: &Config, source: &str) -> Result<()> {
    let log_path = logging::init(config.log_level())?;
    info!(source, log = %log_path.display(), "starting invoicedesk");

    let mut controller = RowViewController::new(service, config.roster(), config.start_view());
    let result = invoicedesk_tui::run_app(&mut controller);
    info!(ok = result.is_ok(), "invoicedesk stopped");
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("invoicedesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch against generated rows held in memory");
    println!("  --check                  Validate config and reach the server once");
    println!("  --help                   Show this help");
}
