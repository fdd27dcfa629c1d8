//! Integration tests for dispatch and traversal across a container tree.

use std::sync::Arc;

use meridian_core::fixtures::{self, MockRequest};
use meridian_core::{
    shortcuts, ApiContainer, Binding, Callback, ErrorCategory, Listing, OperationSource, PathArgs,
    Reply, Resource, ResourceApi,
};
use serde_json::json;

fn tree() -> (Arc<ApiContainer>, Arc<ResourceApi>) {
    let library = fixtures::library_api().unwrap();
    let v1 = ApiContainer::version(1).add(library.clone()).build().unwrap();
    let root = ApiContainer::interface().add(v1).build().unwrap();
    (root, library)
}

#[test]
fn test_full_paths_follow_registration_order() {
    let (root, _) = tree();
    let paths: Vec<(String, String)> = root
        .operation_paths(None)
        .map(|(path, op)| (path.render(), op.operation_id().to_string()))
        .collect();

    assert_eq!(
        paths,
        vec![
            ("/api/v1/book".to_string(), "list_books".to_string()),
            ("/api/v1/book".to_string(), "create_book".to_string()),
            ("/api/v1/book/{resource_id}".to_string(), "get_book".to_string()),
            ("/api/v1/book/{resource_id}".to_string(), "delete_book".to_string()),
        ]
    );

    let keys: Vec<u64> = root.operation_paths(None).map(|(_, op)| op.sort_key()).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_listing_envelope_keeps_items_unsliced() {
    let op = shortcuts::listing(Callback::new("list_numbers", |_| {
        Ok(Reply::WithTotal(json!([1, 2, 3]), 10))
    }))
    .build();

    let request = MockRequest::get()
        .query("offset", "0")
        .query("limit", "2")
        .query("bare", "false");
    let reply = op.dispatch(&request, PathArgs::new()).unwrap();

    assert_eq!(
        reply,
        Reply::Listing(Listing {
            results: json!([1, 2, 3]),
            limit: 2,
            offset: 0,
            total_count: Some(10),
        })
    );
}

#[test]
fn test_bound_listing_pages_through_library() {
    let (_, library) = tree();
    let list = library.operation("list_books").unwrap();

    let reply = list
        .dispatch(&MockRequest::get().query("offset", "1").query("limit", "5"), PathArgs::new())
        .unwrap();
    let Reply::Listing(listing) = reply else {
        panic!("expected a listing envelope");
    };
    assert_eq!(listing.results, json!([{"title": "Emma"}, {"title": "Ulysses"}]));
    assert_eq!(listing.total_count, Some(3));

    let bare = list
        .dispatch(&MockRequest::get().query("limit", "1").query("bare", "YES"), PathArgs::new())
        .unwrap();
    assert_eq!(bare, Reply::Value(json!([{"title": "Dune"}])));
}

#[test]
fn test_non_numeric_limit_is_validation_error() {
    let (_, library) = tree();
    let err = library
        .operation("list_books")
        .unwrap()
        .dispatch(&MockRequest::get().query("limit", "ten"), PathArgs::new())
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(err.status_code().as_u16(), 400);
}

#[test]
fn test_create_receives_decoded_body() {
    let (_, library) = tree();
    let create = library.operation("create_book").unwrap();

    let body = json!({"title": "Middlemarch", "num_pages": 880});
    let reply = create
        .dispatch(&MockRequest::post().body(body.clone()), PathArgs::new())
        .unwrap();
    assert_eq!(reply, Reply::Value(body));

    let missing = create.dispatch(&MockRequest::post(), PathArgs::new()).unwrap_err();
    assert_eq!(missing.category(), ErrorCategory::Validation);
}

#[test]
fn test_detail_not_found_body() {
    let (_, library) = tree();
    let mut args = PathArgs::new();
    args.insert("resource_id".to_string(), json!(99));

    let err = library
        .operation("get_book")
        .unwrap()
        .dispatch(&MockRequest::get(), args)
        .unwrap_err();
    let body = err.to_error_body();
    assert_eq!(body.status, 404);
    assert_eq!(body.message, "book 99 not found");
}

#[test]
fn test_delete_declares_two_responses_plus_default() {
    let (_, library) = tree();
    let doc = library.operation("delete_book").unwrap().to_documentation();
    let statuses: Vec<&str> = doc.responses.keys().map(String::as_str).collect();

    assert_eq!(statuses.len(), 3);
    assert!(statuses.contains(&"204"));
    assert!(statuses.contains(&"404"));
    assert!(statuses.contains(&"default"));
    assert_eq!(doc.responses["204"].description, "Book has been deleted.");
}

#[test]
fn test_operations_inherit_owner_tags_and_resource() {
    let (_, library) = tree();
    let owner: Arc<dyn Binding> = library.clone();
    for op in library.operations() {
        assert_eq!(op.tags(), vec!["library".to_string()]);
        assert_eq!(op.resource().unwrap().resource_name(), "library.Book");
        assert!(op.bind_to(&owner).is_ok());
    }
}

#[test]
fn test_resource_api_cannot_join_two_containers() {
    let library = fixtures::library_api().unwrap();
    let _v1 = ApiContainer::version(1).add(library.clone()).build().unwrap();

    let err = ApiContainer::version(2).add(library).build().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn test_interface_requires_absolute_prefix() {
    let err = ApiContainer::interface().path_prefix("api").build().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}
