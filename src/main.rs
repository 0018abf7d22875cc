mod cli;
mod db;
mod ensure;
mod error;
mod fmt;
mod ingest;
mod models;
mod reports;
mod repository;
mod settings;
#[cfg(test)]
mod testing;
mod validator;

use std::io;

use clap::Parser;

use cli::{Cli, Commands, TransactionsCommands, UsersCommands};
use error::Category;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let db = cli.database();

    let result = match &cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir.clone()),
        Commands::Ingest { file, name } => cli::ingest::run(&db, file, name.as_deref()),
        Commands::Summary { user, sync } => cli::summary::run(&db, *user, *sync),
        Commands::Accounts => cli::accounts::list(&db),
        Commands::Users { command } => match command {
            UsersCommands::Show { id } => cli::users::show(&db, *id),
            UsersCommands::Find { email } => cli::users::find(&db, email),
            UsersCommands::Update { id, name, email } => cli::users::update(&db, *id, name, email),
        },
        Commands::Transactions { command } => match command {
            TransactionsCommands::Origin { name } => cli::transactions::by_origin(&db, name),
            TransactionsCommands::Show { id } => cli::transactions::show(&db, id),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        let code = match e.category() {
            Category::Input | Category::Validation => 2,
            Category::Persistence => 1,
        };
        std::process::exit(code);
    }
}
