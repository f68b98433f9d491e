pub mod article;
pub mod login;

pub use article::{
    ArticleSource, ArticleState, ArticleView, DiagramRenderer, PassthroughDiagram, LOAD_FAILURE,
};
pub use login::{consume_callback_token, sign_in_with_google};
