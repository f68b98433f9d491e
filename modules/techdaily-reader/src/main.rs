use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use techdaily_client::ApiClient;
use techdaily_common::Config;
use techdaily_reader::article::{ArticleState, ArticleView, PassthroughDiagram};
use techdaily_reader::login::{consume_callback_token, sign_in_with_google};
use techdaily_render::text::render_text;
use techdaily_render::render_markdown;
use techdaily_session::{
    require_no_session, require_session, GuardDecision, SessionStore, TokenStorage,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("techdaily=info".parse()?))
        .init();

    info!("TechDaily reader starting");

    let config = Config::from_env();
    let mut store = SessionStore::hydrate(TokenStorage::new(&config.token_path));

    match std::env::args().nth(1).as_deref() {
        None => read_today(&config, &store).await,
        Some("login") => login(&config, &mut store).await,
        Some("callback") => callback(&mut store),
        Some("logout") => {
            store.sign_out();
            println!("Signed out.");
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!(
                "Usage: reader [login --id-token <jwt> | login --url | callback '<query>' | logout]"
            );
            std::process::exit(2);
        }
    }
}

/// Default command: show today's briefing, or where the app would send an
/// unauthenticated visitor.
async fn read_today(config: &Config, store: &SessionStore) -> Result<()> {
    if let GuardDecision::Redirect(dest) = require_session(store) {
        println!("Not signed in. The app would navigate to {dest}.");
        std::process::exit(1);
    }

    let client = ApiClient::new(&config.api_base_url, store.token());
    let mut view = ArticleView::new();
    view.load(&client).await;

    match view.state() {
        ArticleState::Loaded(article) => {
            println!("{}", article.title);
            if let Some(domain) = &article.domain {
                println!("[{domain}]");
            }
            println!();
            print!("{}", render_text(&render_markdown(&article.content)));
            if let Some(diagram) = view.diagram(&PassthroughDiagram, config.theme).await {
                println!();
                println!("{diagram}");
            }
            Ok(())
        }
        ArticleState::Errored(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
        // load() never leaves the view in Loading.
        ArticleState::Loading => Ok(()),
    }
}

async fn login(config: &Config, store: &mut SessionStore) -> Result<()> {
    if let GuardDecision::Redirect(dest) = require_no_session(store) {
        println!("Already signed in. The app would navigate to {dest}.");
        return Ok(());
    }

    let client = ApiClient::new(&config.api_base_url, None);
    match std::env::args().nth(2).as_deref() {
        Some("--id-token") => {
            let id_token = std::env::args().nth(3).expect("--id-token requires a value");
            if sign_in_with_google(&client, store, &id_token).await? {
                let email = store.user().map(|u| u.email.clone()).unwrap_or_default();
                println!("Signed in as {email}.");
                Ok(())
            } else {
                let message = store
                    .login_error()
                    .unwrap_or("Google login failed")
                    .to_string();
                eprintln!("{message}");
                std::process::exit(1);
            }
        }
        Some("--url") => {
            println!("{}", client.google_redirect_url());
            Ok(())
        }
        _ => {
            eprintln!("Usage: reader login --id-token <jwt> | reader login --url");
            std::process::exit(2);
        }
    }
}

fn callback(store: &mut SessionStore) -> Result<()> {
    let query = std::env::args()
        .nth(2)
        .expect("callback requires the return query string");
    let dest = consume_callback_token(store, &query)?;
    println!("Continue to {dest}.");
    Ok(())
}
