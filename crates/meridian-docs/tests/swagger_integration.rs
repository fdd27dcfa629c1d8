//! Integration tests for Swagger document generation over a full API tree.
//!
//! The tree mirrors a typical deployment: an `/api` interface holding a
//! versioned collection with two resource APIs and the swagger container.

use std::sync::Arc;

use meridian_core::fixtures::{self, MockRequest};
use meridian_core::{
    shortcuts, ApiContainer, Callback, In, Param, PathArgs, Reply, ResourceApi, ResponseEntry,
};
use meridian_core::doc::SchemaType;
use meridian_docs::{StaticAssets, SwaggerGenerator, SwaggerSpec};
use proptest::prelude::*;
use serde_json::{json, Value};

struct Deployment {
    _root: Arc<ApiContainer>,
    v1: Arc<ApiContainer>,
    swagger: Arc<SwaggerSpec>,
}

fn author_api() -> Arc<ResourceApi> {
    ResourceApi::builder(fixtures::author_resource())
        .tag("people")
        .operation(
            shortcuts::update(
                Callback::new("update_author", |_| Ok(Reply::Empty)).doc("Replace an author."),
            )
            .build(),
        )
        .operation(
            shortcuts::patch(
                Callback::new("patch_author", |inv| {
                    Ok(Reply::Value(inv.args.first().cloned().unwrap_or(Value::Null)))
                })
                .parameter(Param::header("X-Request-Id", SchemaType::String, "Correlation id"))
                .response(ResponseEntry::new(200, "Patched {name} returned")),
            )
            .build(),
        )
        .build()
        .unwrap()
}

fn deploy() -> Deployment {
    let swagger = SwaggerSpec::builder("Library")
        .enable_ui(true)
        .assets(StaticAssets::bundled())
        .build()
        .unwrap();
    let v1 = ApiContainer::version(1)
        .add(fixtures::library_api().unwrap())
        .add(author_api())
        .add(swagger.clone())
        .build()
        .unwrap();
    let root = ApiContainer::interface().add(v1.clone()).build().unwrap();
    Deployment {
        _root: root,
        v1,
        swagger,
    }
}

fn fetch_document(swagger: &SwaggerSpec) -> Value {
    let reply = swagger
        .operation("get_swagger")
        .unwrap()
        .dispatch(&MockRequest::get().with_host("books.example.com"), PathArgs::new())
        .unwrap();
    match reply {
        Reply::Value(document) => document,
        other => panic!("unexpected reply: {other:?}"),
    }
}

fn keys(value: &Value) -> Vec<&str> {
    value.as_object().unwrap().keys().map(String::as_str).collect()
}

#[test]
fn test_paths_in_registration_order() {
    let deployment = deploy();
    let document = fetch_document(&deployment.swagger);

    assert_eq!(
        keys(&document["paths"]),
        vec![
            "/book",
            "/book/{resource_id}",
            "/author/{resource_id}",
            "/swagger",
            "/swagger/ui",
            "/swagger/ui/{file_name}",
        ]
    );
    assert_eq!(keys(&document["paths"]["/author/{resource_id}"]), vec!["parameters", "put", "patch"]);
}

#[test]
fn test_definitions() {
    let deployment = deploy();
    let document = fetch_document(&deployment.swagger);

    assert_eq!(
        keys(&document["definitions"]),
        vec!["Error", "Listing", "library.Book", "library.Author"]
    );

    let book = &document["definitions"]["library.Book"];
    assert_eq!(book["type"], "object");
    assert_eq!(book["properties"]["title"]["description"], "Title of the book");
    assert_eq!(book["properties"]["num_pages"], json!({"type": "integer", "format": "int64"}));
    assert_eq!(book["properties"]["genre"]["enum"], json!(["sci-fi", "fantasy", "biography"]));
}

#[test]
fn test_listing_operation_document() {
    let deployment = deploy();
    let document = fetch_document(&deployment.swagger);
    let list = &document["paths"]["/book"]["get"];

    assert_eq!(list["operationId"], "list_books");
    assert_eq!(list["description"], "List all books in the library.");
    assert_eq!(list["tags"], json!(["library"]));

    let names: Vec<&str> = list["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["offset", "limit", "bare"]);
    assert_eq!(list["parameters"][0]["in"], "query");
    assert_eq!(list["parameters"][1]["default"], 50);

    assert_eq!(list["responses"]["200"]["schema"]["$ref"], "#/definitions/Listing");
    assert_eq!(list["responses"]["default"]["schema"]["$ref"], "#/definitions/Error");
}

#[test]
fn test_resource_body_operations() {
    let deployment = deploy();
    let document = fetch_document(&deployment.swagger);

    let create = &document["paths"]["/book"]["post"];
    assert_eq!(create["responses"]["201"]["description"], "Book has been created");
    let body = &create["parameters"][0];
    assert_eq!(body["in"], In::Body.as_str());
    assert_eq!(body["required"], true);
    assert_eq!(body["schema"]["$ref"], "#/definitions/library.Book");

    let patch = &document["paths"]["/author/{resource_id}"]["patch"];
    assert_eq!(patch["responses"]["200"]["description"], "Patched Author returned");
    assert_eq!(patch["parameters"][0]["in"], "header");
    assert_eq!(patch["parameters"][1]["in"], "body");

    let delete = &document["paths"]["/book/{resource_id}"]["delete"];
    assert!(delete["responses"]["204"].get("schema").is_none());
}

#[test]
fn test_document_is_stable() {
    let deployment = deploy();
    let first = serde_json::to_string(&fetch_document(&deployment.swagger)).unwrap();
    let second = serde_json::to_string(&fetch_document(&deployment.swagger)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generator_matches_container() {
    let deployment = deploy();
    let from_container = fetch_document(&deployment.swagger);

    let from_generator = SwaggerGenerator::new("Library")
        .version("1")
        .host("books.example.com")
        .base_path("/api/v1")
        .generate(deployment.v1.as_ref())
        .to_value()
        .unwrap();

    assert_eq!(from_container, from_generator);
}

#[test]
fn test_bundled_ui() {
    let deployment = deploy();
    let reply = deployment
        .swagger
        .operation("get_ui")
        .unwrap()
        .dispatch(&MockRequest::get(), PathArgs::new())
        .unwrap();

    let Reply::Raw(response) = reply else {
        panic!("expected a raw response");
    };
    let html = String::from_utf8(response.body.to_vec()).unwrap();
    assert!(html.contains(r#"url: "/api/v1/swagger""#));
    assert!(!html.contains("{{SWAGGER_PATH}}"));

    let mut args = PathArgs::new();
    args.insert("file_name".to_string(), json!("ui.css"));
    let css = deployment.swagger.operation("get_static").unwrap().dispatch(&MockRequest::get(), args);
    assert!(matches!(css, Ok(Reply::Raw(_))));
}

proptest! {
    #[test]
    fn prop_every_api_documented(names in prop::collection::btree_set("[a-z]{1,8}", 1..6)) {
        let mut builder = ApiContainer::version(3);
        for name in &names {
            let api = ResourceApi::builder(fixtures::book_resource())
                .api_name(name.clone())
                .operation(shortcuts::detail(Callback::new(format!("get_{name}"), |_| Ok(Reply::Empty))).build())
                .build()
                .unwrap();
            builder = builder.add(api);
        }
        let v3 = builder.build().unwrap();

        let generator = SwaggerGenerator::new("Generated");
        let document = generator.generate(v3.as_ref());
        prop_assert_eq!(document.paths.len(), names.len());
        for name in &names {
            let key = format!("/{name}/{{resource_id}}");
            prop_assert!(document.paths.contains_key(&key));
        }
        prop_assert_eq!(
            generator.generate_json(v3.as_ref()).unwrap(),
            generator.generate_json(v3.as_ref()).unwrap()
        );
    }
}
