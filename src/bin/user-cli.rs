use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "user-cli")]
#[command(about = "Command-line client for the user proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000", env = "USER_PROXY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all users
    List,
    /// Fetch one user by id
    Get { id: String },
    /// Create a user
    Create {
        #[arg(long)]
        email: String,
    },
    /// Replace a user's email
    Update {
        id: String,
        #[arg(long)]
        email: String,
    },
    /// Delete a user
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List => client.get(format!("{}/users", base)).send().await?,
        Commands::Get { id } => client.get(format!("{}/users/{}", base, id)).send().await?,
        Commands::Create { email } => {
            client
                .post(format!("{}/users", base))
                .json(&json!({ "email": email }))
                .send()
                .await?
        }
        Commands::Update { id, email } => {
            client
                .put(format!("{}/users/{}", base, id))
                .json(&json!({ "email": email }))
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{}/users/{}", base, id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: user proxy returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
