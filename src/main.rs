mod cli;
mod columns;
mod dates;
mod delivery;
mod error;
mod fmt;
mod importer;
mod mailer;
mod models;
mod render;
mod reports;
mod server;
mod settings;
mod weeks;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { bind } => cli::serve::run(bind),
        Commands::Send { file, to, today } => cli::send::run(&file, &to, today.as_deref()),
        Commands::Preview { file, today } => cli::preview::run(&file, today.as_deref()),
        Commands::Init {
            smtp_server,
            smtp_port,
            smtp_username,
            email_from,
            bind,
        } => cli::init::run(cli::init::InitOptions {
            smtp_server,
            smtp_port,
            smtp_username,
            email_from,
            bind,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
