use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "jokes-cli")]
#[command(about = "Command-line client for the jokes API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fixed joke
    Joke,
    /// List every joke with its id
    All,
    /// Fetch one joke by id
    Get { id: String },
    /// Append a joke
    Add { text: String },
    /// Show the like counter
    Likes,
    /// Replace the like counter with a JSON value (e.g. 42)
    SetLikes { value: String },
    /// Insert a user
    CreateUser { name: String, age: i64 },
    /// Find users by exact name and/or age
    FindUsers {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
    },
    /// Set the age of every user with the given name
    UpdateUsers { name: String, age: i64 },
    /// Delete every user younger than the given age
    DeleteUsers { age: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Joke => client.get(format!("{base}/joke")),
        Commands::All => client.get(format!("{base}/all")),
        Commands::Get { id } => client.get(format!("{base}/joke/{id}")),
        Commands::Add { text } => client
            .post(format!("{base}/joke"))
            .json(&json!({ "text": text })),
        Commands::Likes => client.get(format!("{base}/likes")),
        Commands::SetLikes { value } => {
            let likes: Value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            client
                .post(format!("{base}/likes"))
                .json(&json!({ "likes": likes }))
        }
        Commands::CreateUser { name, age } => client
            .post(format!("{base}/user"))
            .json(&json!({ "name": name, "age": age })),
        Commands::FindUsers { name, age } => {
            let mut query = Vec::new();
            if let Some(name) = name {
                query.push(("name", name));
            }
            if let Some(age) = age {
                query.push(("age", age));
            }
            client.get(format!("{base}/user")).query(&query)
        }
        Commands::UpdateUsers { name, age } => client
            .put(format!("{base}/user"))
            .json(&json!({ "name": name, "age": age })),
        Commands::DeleteUsers { age } => client
            .delete(format!("{base}/user"))
            .json(&json!({ "age": age })),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
