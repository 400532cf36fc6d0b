use clap::{Args, Parser, Subcommand};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing token; pass --token or set SHEETDESK_TOKEN")]
    MissingToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sheetdesk-cli", about = "SheetDesk REST API operator CLI")]
struct Cli {
    #[arg(long, env = "SHEETDESK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "SHEETDESK_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the host's health probe.
    Ping,
    /// Exchange credentials for a bearer token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    User(UserCommand),
    File(FileCommand),
}

#[derive(Args, Debug)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
enum UserSubcommand {
    Get { id: String },
    List,
}

#[derive(Args, Debug)]
struct FileCommand {
    #[command(subcommand)]
    command: FileSubcommand,
}

#[derive(Subcommand, Debug)]
enum FileSubcommand {
    /// The signed-in user's listing (`GET /excel/files`).
    List,
    /// Every file record (`GET /excel/excel`).
    Records,
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
    },
    Delete {
        id: String,
    },
}

/// One REST call against the host's `/api` proxy.
#[derive(Debug, PartialEq)]
struct ApiCall {
    method: reqwest::Method,
    path: String,
    body: Option<Value>,
}

impl ApiCall {
    fn new(method: reqwest::Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self { method, path: path.into(), body }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Ping => run_ping(&cli).await,
        Command::Login { email, password } => run_login(&cli, email, password).await,
        Command::User(_) | Command::File(_) => {
            let Some(call) = plan(&cli.command) else {
                return Ok(());
            };
            let json = api_request(&cli, call).await?;
            print_json(&json)
        }
    }
}

/// Map a user/file subcommand onto its REST call.
fn plan(command: &Command) -> Option<ApiCall> {
    use reqwest::Method;

    let call = match command {
        Command::Ping | Command::Login { .. } => return None,
        Command::User(user) => match &user.command {
            UserSubcommand::Get { id } => ApiCall::new(Method::GET, format!("/api/users/{id}"), None),
            UserSubcommand::List => ApiCall::new(Method::GET, "/api/users", None),
        },
        Command::File(file) => match &file.command {
            FileSubcommand::List => ApiCall::new(Method::GET, "/api/excel/files", None),
            FileSubcommand::Records => ApiCall::new(Method::GET, "/api/excel/excel", None),
            FileSubcommand::Create { name } => {
                ApiCall::new(Method::POST, "/api/excel/create", Some(file_body(name)))
            }
            FileSubcommand::Update { id, name } => {
                ApiCall::new(Method::PATCH, format!("/api/excel/update/{id}"), Some(file_body(name)))
            }
            FileSubcommand::Delete { id } => ApiCall::new(Method::DELETE, format!("/api/excel/delete/{id}"), None),
        },
    };
    Some(call)
}

/// Create reads `filename`, update reads `name`; send both.
fn file_body(name: &str) -> Value {
    json!({ "filename": name.trim(), "name": name.trim() })
}

async fn run_ping(cli: &Cli) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", cli.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), body: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_login(cli: &Cli, email: &str, password: &str) -> Result<(), CliError> {
    let call = ApiCall::new(
        reqwest::Method::POST,
        "/api/auth/login",
        Some(json!({ "email": email, "password": password })),
    );
    let session = send(cli, call, None).await?;
    println!("{}", session_token(&session)?);
    Ok(())
}

/// Bearer token from a login response, under any of the backend's key spellings.
fn session_token(session: &Value) -> Result<&str, CliError> {
    ["token", "access_token", "accessToken"]
        .iter()
        .find_map(|key| session.get(key).and_then(Value::as_str))
        .ok_or(CliError::MissingField("token"))
}

async fn api_request(cli: &Cli, call: ApiCall) -> Result<Value, CliError> {
    let token = cli.token.as_deref().ok_or(CliError::MissingToken)?;
    send(cli, call, Some(token)).await
}

async fn send(cli: &Cli, call: ApiCall, token: Option<&str>) -> Result<Value, CliError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    }

    let client = reqwest::Client::builder().default_headers(headers).build()?;
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), call.path);

    let request = client.request(call.method, &url);
    let request = if let Some(json) = call.body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), body: text });
    }

    // Mutations may answer with an empty body.
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
