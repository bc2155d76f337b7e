//! OneLogin - command-line client for the OneLogin API

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing::error;

use onelogin_sdk::{
    Client, ClientConfig, HttpRequest, HttpResponse,
    cli::{Cli, Command},
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match Client::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Token => match client.http().get_access_token().await {
            Ok(token) => {
                println!("{token}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        Command::Get { path, id } => {
            let mut request = HttpRequest::get(path);
            request.id = id;
            print_result(client.resources().read_resource(request).await)
        }
        Command::List {
            path,
            cursor_header,
        } => print_result(
            client
                .resources()
                .query(HttpRequest::get(path).with_cursor(cursor_header))
                .await,
        ),
        Command::Apps => print_result(client.apps().list_apps().await),
        Command::Users => print_result(client.users().list_users().await),
    }
}

/// Print a repository result as pretty JSON
fn print_result(result: Option<HttpResponse>) -> ExitCode {
    let Some(response) = result else {
        eprintln!("Request failed, see the log output above for details");
        return ExitCode::FAILURE;
    };

    let rendered = match response.data {
        Value::Null => String::new(),
        ref data => serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()),
    };
    println!("{rendered}");
    ExitCode::SUCCESS
}
