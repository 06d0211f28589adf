//! Paginated listing responses.
//!
//! Every listing answers with the same envelope; only the name of the item
//! array differs:
//!
//! ```json
//! {"total": 10, "offset": 0, "limit": 5, "things": [...]}
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::types::Page;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RestError, RestResult};

/// Builds the JSON body of a page, naming the item array `field`.
pub fn page_body<T: Serialize>(page: Page<T>, field: &str) -> RestResult<Value> {
    let items = serde_json::to_value(page.items).map_err(|e| RestError::InternalError {
        message: format!("Failed to serialize {}: {}", field, e),
    })?;

    let mut body = Map::new();
    body.insert("total".to_string(), page.total.into());
    body.insert("offset".to_string(), page.offset.into());
    body.insert("limit".to_string(), page.limit.into());
    body.insert(field.to_string(), items);
    Ok(Value::Object(body))
}

/// Builds a `200 OK` listing response.
pub fn page_response<T: Serialize>(page: Page<T>, field: &str) -> RestResult<Response> {
    Ok((StatusCode::OK, Json(page_body(page, field)?)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_envelope() {
        let page = Page {
            total: 7,
            offset: 2,
            limit: 2,
            items: vec!["a", "b"],
        };
        assert_eq!(
            page_body(page, "names").unwrap(),
            json!({"total": 7, "offset": 2, "limit": 2, "names": ["a", "b"]})
        );
    }

    #[test]
    fn test_empty_page_keeps_array() {
        let page: Page<String> = Page {
            total: 0,
            offset: 0,
            limit: 10,
            items: vec![],
        };
        assert_eq!(page_body(page, "things").unwrap()["things"], json!([]));
    }
}
