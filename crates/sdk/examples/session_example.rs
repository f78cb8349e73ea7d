use std::sync::Arc;

use tam::{
    Client, CreateClientConfig, Locale, MemoryTokenStore, PagingContext, SessionEvent,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CreateClientConfig::new("http://localhost:8000/api");
    config.locale = Locale::En;

    let client = Client::new(
        config,
        Arc::new(MemoryTokenStore::new()),
        Arc::new(|event: SessionEvent| println!("session event: {:?}", event)),
    )?;

    // Credentials of a development superuser
    match client.auth().login("09120000000", "password").await? {
        tam::ApiResponse::Success(login) => println!("✅ Signed in as {:?}", login.phone_number),
        tam::ApiResponse::Failure { content, .. } => {
            println!("❌ Sign in failed: {}", content.summary());
            return Ok(());
        }
    }

    match client.admin().players.list(&PagingContext::default()).await? {
        tam::ApiResponse::Success(page) => {
            println!("✅ {} players", page.count);
            for player in page.results {
                println!("  #{:?} {}", player.number, player.name);
            }
        }
        tam::ApiResponse::Failure { status, content } => {
            println!("❌ Failed to list players ({}): {}", status, content)
        }
    }

    let news = client.request(Some("blog/articles/".to_string()));
    news.load().await?;
    println!("news loaded: {}", news.data().is_some());

    Ok(())
}
