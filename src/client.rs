use crate::error::{Error, Result};
use reqwest::{Client, Method, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

#[derive(Debug, Clone)]
pub enum Auth {
    PersonalAccessToken { token: String },
    Bearer { token: String },
}

impl Auth {
    fn header_value(&self) -> String {
        match self {
            Auth::PersonalAccessToken { token } | Auth::Bearer { token } => {
                format!("Bearer {}", token)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsanaConfig {
    pub base_url: String,
    pub auth: Auth,
    pub timeout: Option<Duration>,
}

impl AsanaConfig {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        // Validate URL
        let _ = Url::parse(&base_url)
            .map_err(|_| Error::InvalidConfiguration("Invalid base URL".to_string()))?;

        Ok(Self {
            base_url,
            auth,
            timeout: None,
        })
    }

    /// 既定のベースURLで設定を作成
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: Auth::PersonalAccessToken {
                token: token.into(),
            },
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self> {
        use std::env;

        dotenv::dotenv().ok();

        let token = env::var("ASANA_PERSONAL_ACCESS_TOKEN").map_err(|_| {
            Error::ConfigurationMissing(
                "ASANA_PERSONAL_ACCESS_TOKEN not found in environment".to_string(),
            )
        })?;

        let base_url = env::var("ASANA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(base_url, Auth::PersonalAccessToken { token })
    }
}

/// 送信するリクエストボディ（Content-Typeとバイト列）
#[derive(Debug, Clone)]
pub struct RequestBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 認証済みリクエストの生レスポンス
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub headers: header::HeaderMap,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

/// `{"data": ...}` 形式のレスポンスを展開する。`data` が null の場合は `None`
pub(crate) fn parse_data<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>> {
    let envelope: DataEnvelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.data)
}

#[derive(Debug, Clone)]
pub struct AsanaClient {
    pub(crate) client: Client,
    pub(crate) config: Arc<AsanaConfig>,
}

impl AsanaClient {
    pub fn new(config: AsanaConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        // 認証ヘッダーを追加
        let mut auth_value = header::HeaderValue::from_str(&config.auth.header_value())
            .map_err(|_| Error::InvalidConfiguration("Invalid auth header".to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &AsanaConfig {
        &self.config
    }

    /// ベースURLにリソースパス（クエリ文字列を含んでもよい）を連結する
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// 認証付きリクエストを1回送信し、ボディとヘッダーを返す。
    /// 2xx以外のステータスは `Error::ApiError` に分類される。
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody>,
    ) -> Result<RawResponse> {
        debug!(%method, url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let fallback = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            );
            let message = match response.text().await {
                Ok(text) if !text.is_empty() => text,
                _ => fallback,
            };
            warn!(status = status.as_u16(), url, "request returned non-success status");
            return Err(Error::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { body, headers })
    }

    pub(crate) async fn get_one<T>(&self, path: &str, what: &str, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, &self.url_for(path), None).await?;
        parse_data(&response.body)?
            .ok_or_else(|| Error::NotFound(format!("no {} found for ID {}", what, id)))
    }

    pub(crate) async fn post_one<T>(&self, url: &str, body: RequestBody, what: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, url, Some(body)).await?;
        parse_data(&response.body)?
            .ok_or_else(|| Error::NotFound(format!("no {} was received", what)))
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, &self.url_for(path), None).await?;
        Ok(())
    }
}

/// 前後の空白を除いた識別子を返す。空の場合は検証エラー
pub(crate) fn require_id<'a>(id: &'a str, what: &str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::empty_id(what));
    }
    Ok(id)
}

/// パスセグメントとして安全な形にエンコードする
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
