//! リクエスト記述子のシリアライズ
//!
//! クエリ文字列・フォーム・JSONボディへの変換と、サーバー側で計算される
//! 読み取り専用フィールドの除去をここで一括して行う。

use crate::client::RequestBody;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use url::{Url, form_urlencoded};

/// 送信前に必ず取り除く読み取り専用フィールド
pub const READ_ONLY_FIELDS: &[&str] = &["num_hearts"];

pub const OPT_FIELDS_KEY: &str = "opt_fields";

/// `opt_fields` の値を `this.a,this.b` 形式で組み立てる
pub fn opt_fields_value(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| format!("this.{}", f))
        .collect::<Vec<_>>()
        .join(",")
}

/// URLに `opt_fields` が含まれていなければ追加する
pub fn apply_opt_fields(url: &str, fields: &[&str]) -> Result<String> {
    let mut parsed =
        Url::parse(url).map_err(|e| Error::InvalidInput(format!("invalid URL {}: {}", url, e)))?;
    if fields.is_empty() || parsed.query_pairs().any(|(k, _)| k == OPT_FIELDS_KEY) {
        return Ok(parsed.into());
    }
    parsed
        .query_pairs_mut()
        .append_pair(OPT_FIELDS_KEY, &opt_fields_value(fields));
    Ok(parsed.into())
}

/// 記述子をJSON値に変換し、読み取り専用フィールドを除去する
pub fn to_stripped_value<T: Serialize>(request: &T) -> Result<Value> {
    let mut value = serde_json::to_value(request)
        .map_err(|e| Error::SerializationError(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        for field in READ_ONLY_FIELDS {
            map.remove(*field);
        }
    }
    Ok(value)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
            if joined.is_empty() {
                None
            } else {
                Some(joined.join(","))
            }
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// 記述子を順序付きのキー/値ペアに平坦化する（null は省略）
///
/// ペアはキーのアルファベット順になる（`serde_json::Map` はBTreeMap）。構造体のフィールド順ではない。
pub fn to_pairs<T: Serialize>(request: &T) -> Result<Vec<(String, String)>> {
    match to_stripped_value(request)? {
        Value::Object(map) => Ok(pairs_from_map(map)),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::SerializationError(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

fn pairs_from_map(map: Map<String, Value>) -> Vec<(String, String)> {
    map.into_iter()
        .filter_map(|(k, v)| scalar_to_string(&v).map(|s| (k, s)))
        .collect()
}

pub fn encode_pairs<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k.as_ref(), v.as_ref());
    }
    serializer.finish()
}

/// パスにクエリ文字列を付加する。ペアが空ならパスをそのまま返す
pub fn with_query<K, V>(path: &str, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if pairs.is_empty() {
        return path.to_string();
    }
    format!("{}?{}", path, encode_pairs(pairs))
}

/// `application/x-www-form-urlencoded` ボディ
pub fn form_body<T: Serialize>(request: &T) -> Result<RequestBody> {
    let pairs = to_pairs(request)?;
    Ok(RequestBody {
        content_type: "application/x-www-form-urlencoded".to_string(),
        bytes: encode_pairs(&pairs).into_bytes(),
    })
}

/// `{"data": {...}}` 形式のJSONボディ
pub fn json_data_body<T: Serialize>(request: &T) -> Result<RequestBody> {
    let data = to_stripped_value(request)?;
    let bytes = serde_json::to_vec(&serde_json::json!({ "data": data }))
        .map_err(|e| Error::SerializationError(e.to_string()))?;
    Ok(RequestBody {
        content_type: "application/json".to_string(),
        bytes,
    })
}
