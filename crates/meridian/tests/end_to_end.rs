//! Configuration-driven deployment of a documented API tree.

use meridian::core::fixtures::{self, MockRequest};
use meridian::prelude::*;
use serde_json::json;

const CONFIG: &str = r#"
[docs]
title = "Library"
enable_ui = true
host = "books.example.com"
schemes = ["https"]

[listing]
default_limit = 20
max_limit = 100
"#;

#[test]
fn test_configured_swagger_document() {
    let config = ConfigLoader::new().with_string(CONFIG, "toml").unwrap().load().unwrap();
    let swagger = config.docs.swagger_builder().build().unwrap();

    let v1 = ApiContainer::version(1)
        .add(fixtures::library_api().unwrap())
        .add(swagger.clone())
        .build()
        .unwrap();
    let _root = ApiContainer::interface().add(v1).build().unwrap();

    let reply = swagger
        .operation("get_swagger")
        .unwrap()
        .dispatch(&MockRequest::get(), PathArgs::new())
        .unwrap();
    let Reply::Value(document) = reply else {
        panic!("expected a JSON document");
    };

    assert_eq!(document["swagger"], "2.0");
    assert_eq!(document["info"], json!({"title": "Library", "version": "1"}));
    assert_eq!(document["host"], "books.example.com");
    assert_eq!(document["schemes"], json!(["https"]));
    assert_eq!(document["basePath"], "/api/v1");
    assert!(document["paths"].get("/book").is_some());
    assert!(document["paths"].get("/swagger/ui").is_some());
}

#[test]
fn test_configured_listing_options() {
    let config = ConfigLoader::new().with_string(CONFIG, "toml").unwrap().load().unwrap();
    let options = config.listing.to_options();
    assert_eq!(options.default_limit, 20);
    assert_eq!(options.max_limit, Some(100));
}

#[test]
fn test_logging_config_from_defaults() {
    let log = MeridianConfig::default().logging.to_log_config();
    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.level, "info");
}
