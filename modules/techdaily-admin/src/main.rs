use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use techdaily_admin::{PipelineMonitor, ReviewQueue};
use techdaily_client::ApiClient;
use techdaily_common::{Config, JobStatus};
use techdaily_render::render_markdown;
use techdaily_render::text::render_text;
use techdaily_session::{require_admin, GuardDecision, SessionStore, TokenStorage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("techdaily=info".parse()?))
        .init();

    info!("TechDaily admin console starting");

    let config = Config::from_env();
    let store = SessionStore::hydrate(TokenStorage::new(&config.token_path));

    // Guard first; it owns the expiry check and may clear the stored token.
    let storage = TokenStorage::new(&config.token_path);
    if let GuardDecision::Redirect(dest) = require_admin(&storage, Utc::now()) {
        println!("The app would navigate to {dest}.");
        std::process::exit(1);
    }

    let client = ApiClient::new(&config.api_base_url, store.token());
    let mut queue = ReviewQueue::new();

    match std::env::args().nth(1).as_deref() {
        Some("queue") | None => list_queue(&mut queue, &client).await,
        Some("show") => show(&mut queue, &client).await,
        Some("approve") => approve(&mut queue, &client).await,
        Some("reject") => reject(&mut queue, &client).await,
        Some("run") => run(&mut queue, &client).await,
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!(
                "Usage: admin [queue | show <id> | approve <id> | reject <id> <reason...> | run]"
            );
            std::process::exit(2);
        }
    }
}

async fn list_queue(queue: &mut ReviewQueue, client: &ApiClient) -> Result<()> {
    queue.refresh(client).await;
    if queue.candidates().is_empty() {
        println!("No pending candidates.");
        return Ok(());
    }
    println!("{} candidate(s) pending:", queue.candidates().len());
    for candidate in queue.candidates() {
        println!(
            "  {}  {}  ({})",
            candidate.id,
            candidate.title,
            candidate.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn show(queue: &mut ReviewQueue, client: &ApiClient) -> Result<()> {
    let id = std::env::args().nth(2).expect("show requires a candidate id");
    queue.refresh(client).await;
    if !queue.select(&id) {
        eprintln!("No candidate {id} in the queue.");
        std::process::exit(1);
    }
    if let Some(candidate) = queue.selected_candidate() {
        println!("{}  ({})", candidate.title, candidate.created_at.format("%Y-%m-%d"));
        println!();
        print!("{}", render_text(&render_markdown(&candidate.article_md)));
        if let Some(diagram) = &candidate.diagram {
            println!();
            println!("{diagram}");
        }
    }
    Ok(())
}

async fn approve(queue: &mut ReviewQueue, client: &ApiClient) -> Result<()> {
    let id = std::env::args()
        .nth(2)
        .expect("approve requires a candidate id");
    queue.refresh(client).await;
    if let Err(e) = queue.approve(client, &id).await {
        eprintln!("Approve failed: {e}");
        std::process::exit(1);
    }
    println!(
        "Approved {id}. {} candidate(s) remaining.",
        queue.candidates().len()
    );
    Ok(())
}

async fn reject(queue: &mut ReviewQueue, client: &ApiClient) -> Result<()> {
    let id = std::env::args()
        .nth(2)
        .expect("reject requires a candidate id");
    let reason = std::env::args().skip(3).collect::<Vec<_>>().join(" ");
    if reason.is_empty() {
        eprintln!("reject requires a reason");
        std::process::exit(2);
    }
    queue.refresh(client).await;
    queue.select(&id);
    queue.begin_reject();
    if let Err(e) = queue.confirm_reject(client, &id, &reason).await {
        eprintln!("Reject failed: {e}");
        std::process::exit(1);
    }
    println!(
        "Rejected {id}. {} candidate(s) remaining.",
        queue.candidates().len()
    );
    Ok(())
}

async fn run(queue: &mut ReviewQueue, client: &ApiClient) -> Result<()> {
    let job_id = match queue.trigger_pipeline(client).await {
        Ok(job_id) => job_id,
        Err(e) => {
            eprintln!("Pipeline failed to start: {e}");
            std::process::exit(1);
        }
    };
    println!("Pipeline started: job {job_id}");
    println!("Watching (Ctrl-C to stop)...");

    let monitor = PipelineMonitor::new();
    let handle = monitor.handle();
    tokio::select! {
        _ = monitor.watch(queue, client) => {}
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            println!("Stopped watching.");
        }
    }

    if let Some(job) = queue.pipeline() {
        println!("Pipeline {}: {}", job.job_id, job.status);
        if let Some(result) = &job.result {
            if let Some(topic) = &result.topic_name {
                println!("Topic: {topic}");
            }
            if let Some(children) = &result.child_topic_added {
                for child in children {
                    println!("  + {} ({})", child.child_topic, child.child_node_id);
                }
            }
        }
        if let Some(error) = &job.error {
            println!("Error: {error}");
        }
        if job.status == JobStatus::Completed {
            println!("{} candidate(s) now pending.", queue.candidates().len());
        }
    }
    Ok(())
}
