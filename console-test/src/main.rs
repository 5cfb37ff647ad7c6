//! Manual harness: fetch one joke and wait for it with a deadline.
//!
//! `JOKE_API_URL` overrides the endpoint and `WAIT_SECS` the deadline. Point
//! it at a local `mock-server` to try it offline.

use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use webapi_core::QueryParams;

#[derive(Debug, Deserialize)]
struct ChuckNorrisJoke {
    id: u32,
    joke: String,
}

#[derive(Debug, Deserialize)]
struct ChuckNorrisJokeResponse {
    #[serde(rename = "type")]
    kind: String,
    value: ChuckNorrisJoke,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let url = std::env::var("JOKE_API_URL").unwrap_or_else(|_| "http://api.icndb.com/jokes/random".to_string());
    let wait = std::env::var("WAIT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(60));

    let params = QueryParams::new().with("firstName", "John").with("lastName", "Doe");
    let pending = webapi_core::get_with_query::<ChuckNorrisJokeResponse>(&url, &[], Some(params.into()));

    match tokio::time::timeout(wait, pending).await {
        Ok(Ok(response)) => {
            println!("Got result.");
            println!("[{} #{}] {}", response.kind, response.value.id, response.value.joke);
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "request failed");
            println!("Request failed: {e}");
        }
        Err(_) => println!("No result within {}s.", wait.as_secs()),
    }

    println!("Done.");
}
