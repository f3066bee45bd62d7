use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "echo-cli")]
#[command(about = "Probe CLI for the echo server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness check (/ping)
    Ping,
    /// Client address as seen by the server
    Ip,
    /// User agent as seen by the server
    Ua,
    /// Request headers as seen by the server
    Headers,
    /// Platform geolocation headers
    Loc,
    /// Server local time
    Date,
    /// Server Unix time
    Timestamp,
    /// Health status object
    Status,
    /// Cookies sent with the request
    Cookies,
    /// Ask the server to set a cookie
    SetCookie { name: String, value: String },
    /// Resolve a comma-separated domain list on the server
    Dns { domains: String },
    /// POST a body and see it echoed back
    Post { body: String },
    /// Request the 204 endpoint
    NoContent,
}

impl Commands {
    fn path(&self) -> String {
        match self {
            Commands::Ping => "/ping".into(),
            Commands::Ip => "/ip".into(),
            Commands::Ua => "/ua".into(),
            Commands::Headers => "/headers".into(),
            Commands::Loc => "/loc".into(),
            Commands::Date => "/date".into(),
            Commands::Timestamp => "/timestamp".into(),
            Commands::Status => "/check_status".into(),
            Commands::Cookies => "/cookies".into(),
            Commands::SetCookie { name, value } => format!("/cookie_set/{name}/{value}"),
            Commands::Dns { domains } => format!("/dns/{domains}"),
            Commands::Post { .. } => "/post".into(),
            Commands::NoContent => "/generate_204".into(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path());

    let request = match cli.command {
        Commands::Post { body } => client.post(&url).body(body),
        _ => client.get(&url),
    };
    let res = request.send().await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    for cookie in res.headers().get_all(reqwest::header::SET_COOKIE) {
        eprintln!("Set-Cookie: {}", cookie.to_str().unwrap_or("<binary>"));
    }

    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if is_json {
        let json: Value = serde_json::from_str(&text)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if text.is_empty() {
        println!("({})", status);
    } else {
        println!("{}", text);
    }
    Ok(())
}
