//! Deterministic URL construction for every action.
//!
//! A request URL is `<base><resource><extension>?_action=<Action>` followed
//! by the caller's parameters in the order given. Keys and values are
//! percent-encoded; only RFC 3986 unreserved characters survive unescaped.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

use crate::action::{Action, ACTION_PARAM};
use crate::http::HttpRequest;
use crate::object::ObjectContract;

const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode one query key or value.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

/// Base URL prefix plus the per-resource file suffix. Immutable once built.
///
/// The prefix is used exactly as given: `https://x/api/` and `https://x/api_`
/// are both valid, and no separator is inserted before the resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    file_extension: String,
}

impl Endpoint {
    pub fn new(base: &str, file_extension: &str) -> Self {
        Self {
            base: base.to_string(),
            file_extension: file_extension.to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// URL of a resource without any query string.
    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}{}{}", self.base, resource, self.file_extension)
    }

    /// Build the request for `action` on `resource`. Duplicate keys are
    /// passed through as repeated parameters.
    pub fn build<K, V>(&self, resource: &str, action: Action, params: &[(K, V)]) -> HttpRequest
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.resource_url(resource);
        url.push('?');
        url.push_str(ACTION_PARAM);
        url.push('=');
        url.push_str(action.as_str());
        for (key, value) in params {
            url.push('&');
            url.push_str(&encode_component(key.as_ref()));
            url.push('=');
            url.push_str(&encode_component(value.as_ref()));
        }
        HttpRequest { action, url }
    }

    pub fn build_load(&self, object: &dyn ObjectContract, id: Uuid) -> HttpRequest {
        self.build(
            object.resource_name(),
            Action::Load,
            &[(object.primary_key_name(), id.to_string().as_str())],
        )
    }

    pub fn build_load_by_field(&self, resource: &str, field: &str, value: &str) -> HttpRequest {
        self.build(resource, Action::Load, &[(field, value)])
    }

    pub fn build_list(&self, resource: &str, criterion: Option<(&str, &str)>) -> HttpRequest {
        match criterion {
            Some(pair) => self.build(resource, Action::List, &[pair]),
            None => self.build::<&str, &str>(resource, Action::List, &[]),
        }
    }

    pub fn build_create<K, V>(&self, resource: &str, fields: &[(K, V)]) -> HttpRequest
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.build(resource, Action::Create, fields)
    }

    /// Commit request: the identifying pair first, then the dirty diff.
    pub fn build_commit(&self, object: &dyn ObjectContract) -> HttpRequest {
        let mut params = vec![identity_param(object)];
        params.extend(object.dirty_fields());
        self.build(object.resource_name(), Action::Commit, &params)
    }

    pub fn build_delete(&self, object: &dyn ObjectContract) -> HttpRequest {
        self.build(
            object.resource_name(),
            Action::Delete,
            &[identity_param(object)],
        )
    }
}

fn identity_param(object: &dyn ObjectContract) -> (String, String) {
    (
        object.primary_key_name().to_string(),
        object.object_id().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::testing::Widget;

    fn endpoint() -> Endpoint {
        Endpoint::new("https://x/", ".json")
    }

    #[test]
    fn load_request_carries_action_then_primary_key() {
        let id = Uuid::nil();
        let req = endpoint().build_load(&Widget::default(), id);
        assert_eq!(req.action, Action::Load);
        assert_eq!(
            req.url,
            "https://x/Widget.json?_action=Load&id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let req = endpoint().build("Widget", Action::List, &[("a&b=c", "x y?z")]);
        assert_eq!(
            req.url,
            "https://x/Widget.json?_action=List&a%26b%3Dc=x%20y%3Fz"
        );
    }

    #[test]
    fn non_ascii_is_utf8_percent_encoded() {
        assert_eq!(encode_component("café"), "caf%C3%A9");
        assert_eq!(encode_component("a+b/c"), "a%2Bb%2Fc");
        assert_eq!(encode_component("keep-this_one.~"), "keep-this_one.~");
    }

    #[test]
    fn parameter_order_and_duplicates_are_preserved() {
        let req = endpoint().build_create("Widget", &[("tag", "b"), ("name", "n"), ("tag", "a")]);
        assert_eq!(
            req.url,
            "https://x/Widget.json?_action=Create&tag=b&name=n&tag=a"
        );
    }

    #[test]
    fn list_without_criterion_has_only_the_action() {
        let req = endpoint().build_list("Widget", None);
        assert_eq!(req.url, "https://x/Widget.json?_action=List");
        let req = endpoint().build_list("Widget", Some(("id_Owner", "7")));
        assert_eq!(req.url, "https://x/Widget.json?_action=List&id_Owner=7");
    }

    #[test]
    fn commit_appends_dirty_fields_after_identity() {
        let mut widget = Widget::with_id(Uuid::nil());
        widget.rename("New name");
        let req = endpoint().build_commit(&widget);
        assert_eq!(req.action, Action::Commit);
        assert_eq!(
            req.url,
            "https://x/Widget.json?_action=Commit&id=00000000-0000-0000-0000-000000000000&name=New%20name"
        );
    }

    #[test]
    fn delete_is_keyed_by_identity() {
        let req = endpoint().build_delete(&Widget::with_id(Uuid::nil()));
        assert_eq!(
            req.url,
            "https://x/Widget.json?_action=Delete&id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn base_is_a_verbatim_prefix() {
        let endpoint = Endpoint::new("https://x/api/v1/pfx_", ".json");
        let req = endpoint.build::<&str, &str>("Widget", Action::List, &[]);
        assert_eq!(req.url, "https://x/api/v1/pfx_Widget.json?_action=List");

        let endpoint = Endpoint::new("http://localhost:3000/", ".mustache");
        assert_eq!(
            endpoint.resource_url("Widget"),
            "http://localhost:3000/Widget.mustache"
        );
    }
}
