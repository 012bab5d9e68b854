use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use serde::Deserialize;

pub const MODELS_URL: &str = "https://models.dev/api/models";

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Retrieve the ids of the models listed on models.dev
pub async fn fetch_models() -> Result<Vec<String>> {
    fetch_models_from(MODELS_URL).await
}

pub async fn fetch_models_from(url: &str) -> Result<Vec<String>> {
    let response = reqwest::get(url).await?;
    if response.status() != StatusCode::OK {
        return Err(anyhow!("failed to fetch models: {}", response.status()));
    }

    let entries: Vec<ModelEntry> = response.json().await?;
    Ok(entries.into_iter().map(|entry| entry.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_models_from() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "gpt-4o", "object": "model", "owned_by": "openai", "created": 1},
                {"id": "claude-3-5-sonnet-latest", "object": "model", "owned_by": "anthropic", "created": 2}
            ])))
            .mount(&server)
            .await;

        let models = fetch_models_from(&format!("{}/api/models", server.uri())).await?;
        assert_eq!(models, vec!["gpt-4o", "claude-3-5-sonnet-latest"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_models_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetch_models_from(&server.uri()).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to fetch models: 503"));
    }
}
