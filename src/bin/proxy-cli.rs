use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use prefix_proxy::routing::{Route, RoutingConfig};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Manage routes of a running prefix-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current routes
    Show,
    /// Replace all routes with the given PATH=TARGET pairs
    Set {
        #[arg(short, long, env = "ADMIN_PASSWORD")]
        password: String,
        routes: Vec<String>,
    },
    /// Append one PATH=TARGET route to the current set
    Add {
        #[arg(short, long, env = "ADMIN_PASSWORD")]
        password: String,
        route: String,
    },
}

/// Parse `path=target`, prepending `/` to the path when missing.
fn parse_route(spec: &str) -> Result<Route, String> {
    let (path, target) = spec
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=TARGET, got '{spec}'"))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("empty path in '{spec}'"));
    }
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(Route::new(path, target.trim()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/config", cli.url.trim_end_matches('/'));

    match cli.command {
        Commands::Show => {
            let res = client.get(&endpoint).send().await?;
            print_response(res).await?;
        }
        Commands::Set { password, routes } => {
            let routes = routes
                .iter()
                .map(|s| parse_route(s))
                .collect::<Result<Vec<_>, _>>()?;
            let res = client
                .post(&endpoint)
                .json(&json!({ "routes": routes, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Add { password, route } => {
            let route = parse_route(&route)?;
            let mut current: RoutingConfig = client
                .get(&endpoint)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            current.routes.push(route);
            let res = client
                .post(&endpoint)
                .json(&json!({ "routes": current.routes, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: config API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route() {
        assert_eq!(
            parse_route("openai=https://api.openai.com").unwrap(),
            Route::new("/openai", "https://api.openai.com")
        );
        assert_eq!(
            parse_route("/a/b=http://x?y=1").unwrap(),
            Route::new("/a/b", "http://x?y=1")
        );
        assert!(parse_route("no-equals").is_err());
        assert!(parse_route("=http://x").is_err());
    }
}
