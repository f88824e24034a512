use async_trait::async_trait;
use reqwest::{Request, Response};

/// The network layer every executor sends requests through.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
