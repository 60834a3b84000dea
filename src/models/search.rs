/// ワークスペースのタスク検索条件
///
/// キーと値の順序付きの集まり。同じキーを再度指定すると、
/// 最初に追加された位置のまま値だけが置き換わる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    fields: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    fn custom_field(self, id: &str, op: &str, value: String) -> Self {
        self.field(format!("custom_fields.{}.{}", id, op), value)
    }

    pub fn custom_field_is_set(self, id: &str, value: bool) -> Self {
        self.custom_field(id, "is_set", value.to_string())
    }

    pub fn custom_field_value(self, id: &str, value: impl Into<String>) -> Self {
        self.custom_field(id, "value", value.into())
    }

    pub fn custom_field_starts_with(self, id: &str, value: impl Into<String>) -> Self {
        self.custom_field(id, "starts_with", value.into())
    }

    pub fn custom_field_ends_with(self, id: &str, value: impl Into<String>) -> Self {
        self.custom_field(id, "ends_with", value.into())
    }

    pub fn custom_field_contains(self, id: &str, value: impl Into<String>) -> Self {
        self.custom_field(id, "contains", value.into())
    }

    pub fn custom_field_less_than(self, id: &str, value: f64) -> Self {
        self.custom_field(id, "less_than", format!("{:.6}", value))
    }

    pub fn custom_field_greater_than(self, id: &str, value: f64) -> Self {
        self.custom_field(id, "greater_than", format!("{:.6}", value))
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
