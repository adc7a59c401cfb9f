// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod config;
mod iam;
mod store;
mod todo;

use config::Config;
use iam::{AuthMiddlewareFactory, IamService};
use store::SqliteStore;
use todo::TodoService;

const DEFAULT_CONFIG_PATH: &str = "tido.yaml";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(path) => path,
        Err(error) => {
            eprintln!("Invalid command line arguments: {}", error);
            eprintln!("Usage: tido [-c <config.yaml>]");
            std::process::exit(1);
        }
    };

    let config = Config::load_or_default(&config_path)
        .and_then(Config::validate)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let store = Arc::new(
        SqliteStore::open(&config.database.path).map_err(|e| std::io::Error::other(e.to_string()))?,
    );
    let iam = Arc::new(IamService::new(&config, store.clone()));
    let todos = Arc::new(TodoService::new(store));

    let bind_address = config.server.bind_address.clone();
    let port = config.server.port;
    info!(
        "Starting {} on {}:{} (database: {})",
        config.app_name,
        bind_address,
        port,
        config.database.path.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(iam.clone()))
            .app_data(web::Data::from(todos.clone()))
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .wrap(AuthMiddlewareFactory)
            .configure(api::configure)
    })
    .bind((bind_address, port))?
    .run()
    .await
}

fn parse_args<I>(mut args: I) -> Result<PathBuf, String>
where
    I: Iterator<Item = String>,
{
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("{} requires a path argument", arg))?;
                config_path = PathBuf::from(value);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(config_path)
}
