//! HTTP semantics helpers.
//!
//! Every catalog entry maps to exactly one HTTP method. The method decides how arguments travel
//! (query vs. JSON body) and which MCP `ToolAnnotations` the tool advertises.

use rmcp::model::ToolAnnotations;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate MCP tool annotations based on HTTP method semantics.
///
/// `openWorldHint` is always `true`: every tool talks to the remote messaging API.
#[must_use]
pub fn annotations_for_method(method: HttpMethod, title: &str) -> ToolAnnotations {
    let title = Some(title.to_string());
    let open_world_hint = Some(true);

    match method {
        HttpMethod::Get => ToolAnnotations {
            title,
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint,
        },
        HttpMethod::Post => ToolAnnotations {
            title,
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(false),
            open_world_hint,
        },
        HttpMethod::Put => ToolAnnotations {
            title,
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(true),
            open_world_hint,
        },
        HttpMethod::Delete => ToolAnnotations {
            title,
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(true),
            open_world_hint,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpMethod, annotations_for_method};

    #[test]
    fn annotations_set_open_world_for_all_methods() {
        for m in [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
        ] {
            let a = annotations_for_method(m, "t");
            assert_eq!(a.open_world_hint, Some(true));
            assert_eq!(a.title.as_deref(), Some("t"));
        }
    }

    #[test]
    fn annotations_get_is_readonly_and_idempotent() {
        let a = annotations_for_method(HttpMethod::Get, "t");
        assert_eq!(a.read_only_hint, Some(true));
        assert_eq!(a.destructive_hint, Some(false));
        assert_eq!(a.idempotent_hint, Some(true));
    }

    #[test]
    fn annotations_delete_is_destructive() {
        let a = annotations_for_method(HttpMethod::Delete, "t");
        assert_eq!(a.read_only_hint, Some(false));
        assert_eq!(a.destructive_hint, Some(true));
        assert_eq!(a.idempotent_hint, Some(true));
    }

    #[test]
    fn method_maps_to_reqwest() {
        assert_eq!(HttpMethod::Delete.to_reqwest(), reqwest::Method::DELETE);
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }
}
