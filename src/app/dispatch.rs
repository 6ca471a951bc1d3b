use crate::chat::UserContext;
use crate::cli::Commands;
use crate::config::Config;
use crate::llm::create_provider;
use anyhow::Result;
use tracing::info;

/// Route one query through the model and print the decision as JSON.
async fn run_route(config: &Config, query: &str) -> Result<()> {
    let provider = create_provider(&config.llm)?;
    let router = super::build_llm_router(config, provider);
    let decision = router.decide_route(query, "cli", "cli", &[]).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

/// Run `messages` as consecutive turns of one fresh session.
async fn run_ask(config: &Config, messages: &[String], user_id: &str) -> Result<()> {
    let orchestrator = super::build_orchestrator(config).await?;
    let user = UserContext::new(user_id);
    let session = orchestrator.create_session(&user, None).await?;
    info!(session_id = %session.id, turns = messages.len(), "running ask session");

    for message in messages {
        let response = orchestrator
            .handle_message(&session.id, message, &user)
            .await?;
        let agent = response.agent().unwrap_or("unknown");
        println!("> {message}");
        println!("[{agent}] {}", response.reply_text);
        for citation in &response.citations {
            match &citation.url {
                Some(url) => println!("  - {} ({url})", citation.title),
                None => println!("  - {}", citation.title),
            }
        }
        println!();
    }

    Ok(())
}

pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting AskHR router on {host} (random port)");
            } else {
                info!("Starting AskHR router on {host}:{port}");
            }
            crate::gateway::run_gateway(&host, port, config).await
        }

        Commands::Route { query } => run_route(&config, &query).await,

        Commands::Ask { messages, user } => run_ask(&config, &messages, &user).await,
    }
}
