use super::*;

#[test]
fn collection_paths() {
    assert_eq!(Resource::Users.collection_path(), "/users/user/");
    assert_eq!(Resource::Agencies.collection_path(), "/agency/agencies/");
    assert_eq!(Resource::Agents.collection_path(), "/agency/agents/");
    assert_eq!(Resource::Specializations.collection_path(), "/agency/specializations/");
}

#[test]
fn item_paths_keep_trailing_slash() {
    assert_eq!(Resource::Agencies.item_path(12), "/agency/agencies/12/");
    assert_eq!(Resource::Users.item_path(3), "/users/user/3/");
}

#[test]
fn update_methods() {
    assert_eq!(Resource::Users.update_method(), UpdateMethod::Patch);
    assert_eq!(Resource::Specializations.update_method(), UpdateMethod::Patch);
    assert_eq!(Resource::Agencies.update_method(), UpdateMethod::Put);
    assert_eq!(Resource::Agents.update_method(), UpdateMethod::Put);
}

#[test]
fn serde_error_becomes_parse_error() {
    let err: BackendError = serde_json::from_str::<Value>("{").unwrap_err().into();
    assert!(matches!(err, BackendError::Parse(_)));
}

#[test]
fn default_timeouts() {
    let t = BackendTimeouts::default();
    assert_eq!(t.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(t.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
}
