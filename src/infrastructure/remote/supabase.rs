//! Supabase (PostgREST) remote embedding store

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::http_client::HttpClientTrait;
use crate::domain::sync::{RemoteEmbeddingRow, RemoteEmbeddingStore};
use crate::domain::DomainError;

const DEFAULT_TABLE: &str = "skill_embeddings";

/// Configuration for the Supabase embedding store
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://xyz.supabase.co")
    pub url: String,
    /// Public anonymous API key
    pub anon_key: String,
    /// Table holding the embeddings
    pub table: String,
}

impl SupabaseConfig {
    /// Creates a new configuration
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Sets the table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

/// Embedding store backed by a Supabase table
///
/// The anonymous session token is kept for the lifetime of the store.
#[derive(Debug)]
pub struct SupabaseEmbeddingStore<C: HttpClientTrait> {
    client: C,
    config: SupabaseConfig,
    access_token: RwLock<Option<String>>,
}

impl<C: HttpClientTrait> SupabaseEmbeddingStore<C> {
    /// Creates a new store
    pub fn new(client: C, config: SupabaseConfig) -> Self {
        Self {
            client,
            config,
            access_token: RwLock::new(None),
        }
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    fn select_url(&self) -> String {
        format!(
            "{}?select=skill_name,embedding_vector&order=skill_name.asc",
            self.rows_url()
        )
    }

    fn delete_all_url(&self) -> String {
        // PostgREST refuses unfiltered deletes
        format!("{}?skill_name=neq.", self.rows_url())
    }

    fn upsert_url(&self) -> String {
        format!("{}?on_conflict=skill_name", self.rows_url())
    }

    fn signup_url(&self) -> String {
        format!("{}/auth/v1/signup", self.config.url)
    }

    /// Bearer value: the session token when signed in, the anon key otherwise
    async fn authorization(&self) -> String {
        let token = self.access_token.read().await;
        format!(
            "Bearer {}",
            token.as_deref().unwrap_or(&self.config.anon_key)
        )
    }
}

/// Vector column as returned by PostgREST: a JSON array for `float[]`
/// columns, a string such as `"[0.1,0.2]"` for pgvector columns
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireVector {
    List(Vec<f64>),
    Text(String),
}

impl WireVector {
    fn into_vec(self) -> Result<Vec<f64>, DomainError> {
        match self {
            WireVector::List(values) => Ok(values),
            WireVector::Text(text) => serde_json::from_str(&text).map_err(|e| {
                DomainError::remote(format!("Invalid embedding vector '{}': {}", text, e))
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireRow {
    skill_name: String,
    embedding_vector: WireVector,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    access_token: Option<String>,
    session: Option<SignupSession>,
}

#[derive(Debug, Deserialize)]
struct SignupSession {
    access_token: String,
}

fn parse_rows(json: serde_json::Value) -> Result<Vec<RemoteEmbeddingRow>, DomainError> {
    let rows: Vec<WireRow> = serde_json::from_value(json)
        .map_err(|e| DomainError::remote(format!("Failed to parse embedding rows: {}", e)))?;

    rows.into_iter()
        .map(|row| {
            Ok(RemoteEmbeddingRow {
                skill_name: row.skill_name,
                embedding_vector: row.embedding_vector.into_vec()?,
            })
        })
        .collect()
}

#[async_trait]
impl<C: HttpClientTrait> RemoteEmbeddingStore for SupabaseEmbeddingStore<C> {
    async fn fetch_all(&self) -> Result<Vec<RemoteEmbeddingRow>, DomainError> {
        let auth = self.authorization().await;
        let headers = vec![
            ("apikey", self.config.anon_key.as_str()),
            ("Authorization", auth.as_str()),
        ];

        let json = self.client.get_json(&self.select_url(), headers).await?;
        let rows = parse_rows(json)?;

        debug!(count = rows.len(), table = %self.config.table, "Fetched remote embeddings");
        Ok(rows)
    }

    async fn delete_all(&self) -> Result<(), DomainError> {
        let auth = self.authorization().await;
        let headers = vec![
            ("apikey", self.config.anon_key.as_str()),
            ("Authorization", auth.as_str()),
        ];

        self.client.delete(&self.delete_all_url(), headers).await
    }

    async fn upsert(&self, rows: Vec<RemoteEmbeddingRow>) -> Result<(), DomainError> {
        if rows.is_empty() {
            return Ok(());
        }

        let auth = self.authorization().await;
        let headers = vec![
            ("apikey", self.config.anon_key.as_str()),
            ("Authorization", auth.as_str()),
            ("Content-Type", "application/json"),
            ("Prefer", "resolution=merge-duplicates,return=minimal"),
        ];

        let body = serde_json::to_value(&rows)
            .map_err(|e| DomainError::serialization(format!("Failed to encode rows: {}", e)))?;

        self.client
            .post_json(&self.upsert_url(), headers, &body)
            .await?;

        debug!(count = rows.len(), table = %self.config.table, "Upserted remote embeddings");
        Ok(())
    }

    async fn ensure_session(&self) -> Result<(), DomainError> {
        if self.access_token.read().await.is_some() {
            return Ok(());
        }

        let mut token = self.access_token.write().await;

        // Another caller may have signed in while we waited for the lock
        if token.is_some() {
            return Ok(());
        }

        let headers = vec![
            ("apikey", self.config.anon_key.as_str()),
            ("Content-Type", "application/json"),
        ];

        let json = self
            .client
            .post_json(&self.signup_url(), headers, &serde_json::json!({}))
            .await?;

        let response: SignupResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::remote(format!("Failed to parse signup response: {}", e)))?;

        let access_token = response
            .access_token
            .or(response.session.map(|s| s.access_token))
            .ok_or_else(|| DomainError::remote("Signup response carried no access token"))?;

        info!("Signed in to remote embedding store anonymously");
        *token = Some(access_token);

        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::remote::http_client::mock::MockHttpClient;

    const BASE: &str = "https://project.supabase.co";
    const SELECT_URL: &str = "https://project.supabase.co/rest/v1/skill_embeddings?select=skill_name,embedding_vector&order=skill_name.asc";
    const DELETE_URL: &str = "https://project.supabase.co/rest/v1/skill_embeddings?skill_name=neq.";
    const UPSERT_URL: &str = "https://project.supabase.co/rest/v1/skill_embeddings?on_conflict=skill_name";
    const SIGNUP_URL: &str = "https://project.supabase.co/auth/v1/signup";

    fn store(client: MockHttpClient) -> SupabaseEmbeddingStore<MockHttpClient> {
        SupabaseEmbeddingStore::new(client, SupabaseConfig::new(format!("{}/", BASE), "anon-key"))
    }

    #[tokio::test]
    async fn test_fetch_all_parses_rows() {
        let client = MockHttpClient::new().with_response(
            "GET",
            SELECT_URL,
            serde_json::json!([
                {"skill_name": "Athletics", "embedding_vector": [0.1, 0.2]},
                {"skill_name": "Sneak", "embedding_vector": "[0.3,0.4]"}
            ]),
        );
        let store = store(client);

        let rows = store.fetch_all().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].skill_name, "Athletics");
        assert_eq!(rows[1].embedding_vector, vec![0.3, 0.4]);
    }

    #[tokio::test]
    async fn test_fetch_all_error() {
        let client = MockHttpClient::new().with_error("GET", SELECT_URL, 500, "boom");
        let store = store(client);

        assert!(store.fetch_all().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_malformed_rows() {
        let client = MockHttpClient::new().with_response(
            "GET",
            SELECT_URL,
            serde_json::json!([{"skill_name": "Sneak", "embedding_vector": "not a vector"}]),
        );
        let store = store(client);

        assert!(store.fetch_all().await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_uses_conflict_key() {
        let store = store(MockHttpClient::new());

        store
            .upsert(vec![RemoteEmbeddingRow {
                skill_name: "Sneak".to_string(),
                embedding_vector: vec![0.1],
            }])
            .await
            .unwrap();

        let posts = store.client.requests_to("POST");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, UPSERT_URL);
        assert_eq!(
            posts[0].header("Prefer"),
            Some("resolution=merge-duplicates,return=minimal")
        );
        assert_eq!(
            posts[0].body,
            Some(serde_json::json!([{"skill_name": "Sneak", "embedding_vector": [0.1]}]))
        );
    }

    #[tokio::test]
    async fn test_upsert_empty_is_noop() {
        let store = store(MockHttpClient::new());

        store.upsert(Vec::new()).await.unwrap();

        assert!(store.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_permission_denied() {
        let client = MockHttpClient::new().with_error(
            "DELETE",
            DELETE_URL,
            401,
            r#"{"code":"42501","message":"permission denied for table skill_embeddings"}"#,
        );
        let store = store(client);

        let error = store.delete_all().await.unwrap_err();
        assert!(error.is_permission_denied());
    }

    #[tokio::test]
    async fn test_ensure_session_signs_in_once() {
        let client = MockHttpClient::new().with_response(
            "POST",
            SIGNUP_URL,
            serde_json::json!({"access_token": "session-token", "token_type": "bearer"}),
        );
        let store = store(client);

        store.ensure_session().await.unwrap();
        store.ensure_session().await.unwrap();
        store.delete_all().await.unwrap();

        let requests = store.client.requests();
        assert_eq!(store.client.requests_to("POST").len(), 1);

        let delete = requests.iter().find(|r| r.method == "DELETE").unwrap();
        assert_eq!(delete.header("Authorization"), Some("Bearer session-token"));
        assert_eq!(delete.header("apikey"), Some("anon-key"));
    }

    #[tokio::test]
    async fn test_ensure_session_reads_nested_session() {
        let client = MockHttpClient::new().with_response(
            "POST",
            SIGNUP_URL,
            serde_json::json!({"user": {}, "session": {"access_token": "nested-token"}}),
        );
        let store = store(client);

        store.ensure_session().await.unwrap();

        assert_eq!(store.authorization().await, "Bearer nested-token");
    }

    #[tokio::test]
    async fn test_ensure_session_without_token_fails() {
        let client = MockHttpClient::new().with_response("POST", SIGNUP_URL, serde_json::json!({}));
        let store = store(client);

        assert!(store.ensure_session().await.is_err());
        assert_eq!(store.authorization().await, "Bearer anon-key");
    }

    #[test]
    fn test_store_name() {
        assert_eq!(store(MockHttpClient::new()).store_name(), "supabase");
    }
}
