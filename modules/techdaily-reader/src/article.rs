use async_trait::async_trait;
use tracing::warn;

use techdaily_client::{ApiClient, ApiError};
use techdaily_common::{Article, Theme};

/// Fixed user-facing message when the backend refuses the article request.
pub const LOAD_FAILURE: &str = "Failed to load today's article.";

/// Where today's article comes from. The API client is the production
/// source; tests script their own.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn today_article(&self) -> techdaily_client::Result<Article>;
}

#[async_trait]
impl ArticleSource for ApiClient {
    async fn today_article(&self) -> techdaily_client::Result<Article> {
        ApiClient::today_article(self).await
    }
}

/// Renders diagram markup for display, keyed by the active theme. SVG
/// generation lives outside this repository; the passthrough implementation
/// hands the source straight to the terminal.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, source: &str, theme: Theme) -> String;
}

pub struct PassthroughDiagram;

#[async_trait]
impl DiagramRenderer for PassthroughDiagram {
    async fn render(&self, source: &str, _theme: Theme) -> String {
        source.to_string()
    }
}

/// View state for the daily article. Both outcomes are terminal for the
/// view's lifetime; a retry is a brand-new view.
#[derive(Debug)]
pub enum ArticleState {
    Loading,
    Loaded(Article),
    Errored(String),
}

pub struct ArticleView {
    state: ArticleState,
}

impl ArticleView {
    pub fn new() -> Self {
        Self {
            state: ArticleState::Loading,
        }
    }

    pub fn state(&self) -> &ArticleState {
        &self.state
    }

    /// Issue the single authenticated fetch. A refused request maps to the
    /// fixed failure string; transport and parse faults surface their own
    /// message.
    pub async fn load(&mut self, source: &dyn ArticleSource) {
        match source.today_article().await {
            Ok(article) => self.state = ArticleState::Loaded(article),
            Err(ApiError::Api { status, .. }) => {
                warn!(status = status, "Today's article request was refused");
                self.state = ArticleState::Errored(LOAD_FAILURE.to_string());
            }
            Err(e) => self.state = ArticleState::Errored(e.to_string()),
        }
    }

    /// Hand the diagram source, verbatim, to the renderer. There is nothing
    /// to show unless the article is loaded and carries one.
    pub async fn diagram(&self, renderer: &dyn DiagramRenderer, theme: Theme) -> Option<String> {
        match &self.state {
            ArticleState::Loaded(article) => match article.diagram.as_deref() {
                Some(source) => Some(renderer.render(source, theme).await),
                None => None,
            },
            _ => None,
        }
    }
}

impl Default for ArticleView {
    fn default() -> Self {
        Self::new()
    }
}
