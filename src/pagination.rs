//! ページネーションエンジン
//!
//! ページ単位のRESTコレクションを、呼び出し側の消費と並行して取得される
//! ページのストリームに変換する。
//!
//! - 取得はリソースごとに1つ生成されるワーカータスクが行う
//! - 出力チャネルは容量1で、遅い消費者はワーカーの取得を止める（背圧）
//! - 次ページは前のレスポンスの `next_page.path` で辿り、空なら終了する
//! - 転送・デコードのエラーは最後のページとして届けられ、その後ストリームは閉じる
//! - キャンセルは次のループの先頭、またはページ送信待ちの間に反映される

use crate::client::AsanaClient;
use crate::encoding::apply_opt_fields;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// 次ページへの継続トークン
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPage {
    #[serde(default)]
    pub offset: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub uri: String,
}

impl NextPage {
    /// パスが空でない場合のみ、続きのページが存在する
    pub fn has_more(&self) -> bool {
        !self.path.is_empty()
    }
}

/// 1回のレスポンスから得られたページ
///
/// `error` が設定されている場合、`items` は信頼できない。
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub error: Option<Error>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    pub fn failed(error: Error) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Pager<T> {
    #[serde(default)]
    data: Option<Vec<T>>,
    #[serde(default)]
    next_page: Option<NextPage>,
}

/// `{"data": [...], "next_page": {...}}` を1ページ分デコードする。
/// 失敗した場合はエラーを持つページを返し、継続トークンは `None`
pub fn decode_page<T: DeserializeOwned>(body: &[u8]) -> (Page<T>, Option<NextPage>) {
    match serde_json::from_slice::<Pager<T>>(body) {
        Ok(pager) => (Page::new(pager.data.unwrap_or_default()), pager.next_page),
        Err(err) => (Page::failed(err.into()), None),
    }
}

/// ページ単位で一覧取得できるリソース
pub trait Paginated: DeserializeOwned + Send + 'static {
    /// 毎ページのリクエストに付与する疎フィールド
    const OPT_FIELDS: &'static [&'static str] = &[];

    fn decode_page(body: &[u8]) -> (Page<Self>, Option<NextPage>) {
        decode_page::<Self>(body)
    }
}

/// ワーカーが公開したページを取得順に読み出すハンドル
#[derive(Debug)]
pub struct PageStream<T> {
    receiver: mpsc::Receiver<Page<T>>,
}

impl<T> PageStream<T> {
    /// 次のページを待つ。ストリームが閉じていれば `None`
    pub async fn next(&mut self) -> Option<Page<T>> {
        self.receiver.recv().await
    }

    /// 全ページのアイテムを集める。エラーを持つページがあればそのエラーを返す
    pub async fn collect_items(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next().await {
            items.extend(page.into_result()?);
        }
        Ok(items)
    }
}

/// 一度きりのキャンセル信号。複数回呼んでも失敗しない
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl AsanaClient {
    /// `path` から始まるページングをワーカータスクで開始する。
    /// ネットワークI/Oは行わずに即座に戻る。
    pub(crate) fn paginate<T: Paginated>(
        &self,
        path: String,
    ) -> Result<(PageStream<T>, CancelHandle)> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            Error::Unexpected(format!("pagination requires a tokio runtime: {}", e))
        })?;

        let (page_tx, page_rx) = mpsc::channel(1);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        runtime.spawn(run_pages::<T>(self.clone(), path, page_tx, cancel_rx));

        Ok((
            PageStream { receiver: page_rx },
            CancelHandle {
                sender: Arc::new(cancel_tx),
            },
        ))
    }
}

async fn run_pages<T: Paginated>(
    client: AsanaClient,
    mut path: String,
    pages: mpsc::Sender<Page<T>>,
    mut cancel: watch::Receiver<bool>,
) {
    loop {
        if *cancel.borrow() {
            debug!(path = %path, "pagination cancelled");
            return;
        }
        if pages.is_closed() {
            debug!(path = %path, "page stream dropped");
            return;
        }

        let url = match apply_opt_fields(&client.url_for(&path), T::OPT_FIELDS) {
            Ok(url) => url,
            Err(err) => {
                publish(&pages, &mut cancel, Page::failed(err)).await;
                return;
            }
        };

        debug!(url = %url, "fetching page");
        let response = match client.send(Method::GET, &url, None).await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %url, error = %err, "pagination stopped by request error");
                publish(&pages, &mut cancel, Page::failed(err)).await;
                return;
            }
        };

        let (page, next_page) = T::decode_page(&response.body);
        if let Some(err) = &page.error {
            warn!(url = %url, error = %err, "pagination stopped by decode error");
            publish(&pages, &mut cancel, page).await;
            return;
        }

        if !publish(&pages, &mut cancel, page).await {
            return;
        }

        match next_page {
            Some(next) if next.has_more() => path = next.path,
            _ => return,
        }
    }
}

/// ページを送信する。キャンセルまたは受信側の破棄で送れなかった場合は `false`
async fn publish<T>(
    pages: &mpsc::Sender<Page<T>>,
    cancel: &mut watch::Receiver<bool>,
    page: Page<T>,
) -> bool {
    tokio::select! {
        biased;
        sent = pages.send(page) => sent.is_ok(),
        _ = cancelled(cancel) => {
            debug!("pagination cancelled while waiting for consumer");
            false
        }
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    // ハンドルが破棄されただけではキャンセル扱いにしない
    if cancel.wait_for(|c| *c).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AsanaConfig, Auth};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Item {
        gid: String,
    }

    impl Paginated for Item {
        const OPT_FIELDS: &'static [&'static str] = &["name"];
    }

    fn client_for(server: &MockServer) -> AsanaClient {
        AsanaClient::new(AsanaConfig {
            base_url: server.uri(),
            auth: Auth::PersonalAccessToken {
                token: "test_token".to_string(),
            },
            timeout: None,
        })
        .unwrap()
    }

    fn gids(page: &Page<Item>) -> Vec<&str> {
        page.items.iter().map(|i| i.gid.as_str()).collect()
    }

    #[test]
    fn test_next_page_has_more() {
        assert!(!NextPage::default().has_more());
        let next = NextPage {
            offset: "abc".to_string(),
            path: "/items?offset=abc".to_string(),
            uri: "https://example.com/items?offset=abc".to_string(),
        };
        assert!(next.has_more());
    }

    #[test]
    fn test_decode_page_with_null_next_page() {
        let (page, next) = decode_page::<Item>(br#"{"data": [{"gid": "1"}], "next_page": null}"#);
        assert!(!page.is_err());
        assert_eq!(gids(&page), vec!["1"]);
        assert!(next.is_none());
    }

    #[test]
    fn test_decode_page_malformed() {
        let (page, next) = decode_page::<Item>(b"<html>");
        assert!(matches!(page.error, Some(Error::JsonParsing(_))));
        assert!(page.items.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn test_paginate_outside_runtime_is_error() {
        let client = AsanaClient::new(AsanaConfig::with_token("t")).unwrap();
        let result = client.paginate::<Item>("/items".to_string());
        assert!(matches!(result, Err(Error::Unexpected(_))));
    }

    #[tokio::test]
    async fn test_two_pages_then_close() {
        // Given: 1ページ目に継続トークン、2ページ目はnull
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"gid": "1"}, {"gid": "2"}],
                "next_page": {"offset": "abc", "path": "/items?offset=abc", "uri": "x"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("offset", "abc"))
            .and(query_param("opt_fields", "this.name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"gid": "3"}],
                "next_page": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // When: ページングを開始して読み切る
        let (mut stream, _cancel) = client.paginate::<Item>("/items".to_string()).unwrap();

        // Then: 2ページが順に届き、閉じる
        let first = stream.next().await.unwrap();
        assert_eq!(gids(&first), vec!["1", "2"]);
        let second = stream.next().await.unwrap();
        assert_eq!(gids(&second), vec!["3"]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_error_page_is_last() {
        // Given: 1ページ成功した後に500
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"gid": "1"}],
                "next_page": {"offset": "o1", "path": "/items?offset=o1", "uri": ""}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("offset", "o1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // When
        let (mut stream, _cancel) = client.paginate::<Item>("/items".to_string()).unwrap();

        // Then: 正常ページ1つ、エラーページ1つ、その後閉じる
        let first = stream.next().await.unwrap();
        assert!(!first.is_err());
        let second = stream.next().await.unwrap();
        match second.error {
            Some(Error::ApiError { status, ref message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            ref other => panic!("Expected ApiError, got {:?}", other),
        }
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_path_token_is_last_page() {
        // Given: パスが空の継続トークン
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"gid": "1"}],
                "next_page": {"offset": "zzz", "path": "", "uri": ""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // When
        let (mut stream, _cancel) = client.paginate::<Item>("/items".to_string()).unwrap();

        // Then: 追加の取得は行われない
        assert_eq!(gids(&stream.next().await.unwrap()), vec!["1"]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_decode_error_is_published_then_closes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (mut stream, _cancel) = client.paginate::<Item>("/items".to_string()).unwrap();

        let page = stream.next().await.unwrap();
        assert!(matches!(page.error, Some(Error::JsonParsing(_))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_before_first_fetch() {
        // Given: 常に次ページを返すサーバー
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"gid": "1"}],
                "next_page": {"offset": "o", "path": "/items?offset=o", "uri": ""}
            })))
            .expect(0..=1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // When: 開始直後にキャンセル（2回呼んでも問題ない）
        let (mut stream, cancel) = client.paginate::<Item>("/items".to_string()).unwrap();
        cancel.cancel();
        cancel.cancel();
        assert!(cancel.is_cancelled());

        // Then: 高々1ページで閉じる
        let mut count = 0;
        while stream.next().await.is_some() {
            count += 1;
        }
        assert!(count <= 1);
    }

    #[tokio::test]
    async fn test_cancel_stops_unbounded_stream() {
        // Given: 終わりのないページング
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"gid": "1"}],
                "next_page": {"offset": "o", "path": "/items?offset=o", "uri": ""}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (mut stream, cancel) = client.paginate::<Item>("/items".to_string()).unwrap();

        // When: 1ページ読んでからキャンセル
        assert!(stream.next().await.is_some());
        cancel.cancel();

        // Then: 送信待ちだったページを含めても有限個で閉じる
        let mut remaining = 0;
        while stream.next().await.is_some() {
            remaining += 1;
        }
        assert!(remaining <= 2);
    }

    #[tokio::test]
    async fn test_collect_items_returns_first_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Not Authorized"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (stream, _cancel) = client.paginate::<Item>("/items".to_string()).unwrap();

        let result = stream.collect_items().await;
        assert_eq!(result.unwrap_err().status(), Some(401));
    }
}
