//! Reagent CLI
//!
//! Runs one ReAct session per query against Gemini with the built-in
//! distance tool registered. Without a query it replays the two demo
//! questions the project started from.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use reagent::agent::agent_loop::AgentLoop;
use reagent::agent::registry::ToolRegistry;
use reagent::agent::tools::register_builtin_tools;
use reagent::config::load_config;
use reagent::gemini::GeminiClient;

/// ReAct agent over Gemini with local tool dispatch
#[derive(Parser, Debug)]
#[command(
    name = "reagent",
    version,
    about = "ReAct agent over Gemini with local tool dispatch"
)]
struct Cli {
    /// Natural-language query. Runs the built-in demo queries when omitted.
    query: Option<String>,

    /// Model identifier (overrides REAGENT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Maximum model queries per session (overrides REAGENT_MAX_ITERATIONS)
    #[arg(long)]
    max_iterations: Option<u32>,
}

const DEMO_QUERIES: [&str; 2] = [
    "What is the distance between the point (3, 4) and the origin (0, 0)?",
    "Which distance is greater: the distance from (10, 5) to (2, 9), or the distance \
     from (1, 1) to (1, 10)? Show the calculations.",
];

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }

    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry)?;

    let client = GeminiClient::new(
        config.api_url.clone(),
        config.api_key.clone(),
        config.model.clone(),
    );

    let queries: Vec<String> = match cli.query {
        Some(query) => vec![query],
        None => DEMO_QUERIES.iter().map(|q| q.to_string()).collect(),
    };

    for query in queries {
        println!("{} {}", "Query:".cyan().bold(), query);

        let agent = AgentLoop::new(&client, &registry)
            .with_max_iterations(config.max_iterations);
        let outcome = agent.run(&query).await?;

        println!("{} {}\n", "Answer:".green().bold(), outcome.into_text());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "Fatal:".red().bold(), err);
        std::process::exit(1);
    }
}
