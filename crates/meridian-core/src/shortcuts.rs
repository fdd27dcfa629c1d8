//! Conventional operation factories.
//!
//! Each shortcut returns an [`OperationBuilder`] pre-configured with the
//! usual kind, path suffix, method, summary and response set for a REST
//! resource. Anything can still be overridden before calling `build`.
//!
//! | Shortcut | Kind | Path | Method | Responses |
//! |---|---|---|---|---|
//! | [`listing`] | Listing | *(collection)* | GET | 200 |
//! | [`create`] | ResourceBody | *(collection)* | POST | 201, 400 |
//! | [`detail`] | Plain | `{resource_id}` | GET | 200, 404 |
//! | [`update`] | ResourceBody | `{resource_id}` | PUT | 204, 400, 404 |
//! | [`patch`] | ResourceBody | `{resource_id}` | PATCH | 200, 400, 404 |
//! | [`delete`] | Plain | `{resource_id}` | DELETE | 204, 404 |
//!
//! Every operation additionally carries the default error response.

use http::Method;

use crate::meta::{Callback, ResponseEntry};
use crate::operation::{ListingOptions, Operation, OperationBuilder, OperationKind};
use crate::path::{PathParam, UrlPath};
use crate::resource::{ErrorResource, ListingResource};

fn resource_id() -> UrlPath {
    PathParam::new("resource_id").into()
}

fn validation_failed() -> ResponseEntry {
    ResponseEntry::new(400, "Validation failed.").with_resource(ErrorResource::shared())
}

fn not_found() -> ResponseEntry {
    ResponseEntry::new(404, "Not found").with_resource(ErrorResource::shared())
}

/// A generic operation: empty path, `GET`, no conventional responses.
#[must_use]
pub fn operation(callback: Callback) -> OperationBuilder {
    Operation::builder(callback)
}

/// An operation on the whole collection. Alias of [`operation`].
#[must_use]
pub fn collection(callback: Callback) -> OperationBuilder {
    operation(callback)
}

/// An operation performing an action. Alias of [`operation`].
#[must_use]
pub fn action(callback: Callback) -> OperationBuilder {
    operation(callback)
}

/// Paginated listing with default options.
#[must_use]
pub fn listing(callback: Callback) -> OperationBuilder {
    listing_with(callback, ListingOptions::default())
}

/// Paginated listing with explicit options.
///
/// # Example
///
/// ```
/// use meridian_core::{shortcuts, Callback, ListingOptions, OperationKind, Reply};
///
/// let op = shortcuts::listing_with(
///     Callback::new("list_books", |_| Ok(Reply::Empty)),
///     ListingOptions::new(0, 20).max_limit(100),
/// )
/// .build();
///
/// assert!(matches!(op.kind(), OperationKind::Listing(o) if o.max_limit == Some(100)));
/// ```
#[must_use]
pub fn listing_with(callback: Callback, options: ListingOptions) -> OperationBuilder {
    Operation::builder(callback)
        .kind(OperationKind::Listing(options))
        .method(Method::GET)
        .summary("List resources")
        .response(ResponseEntry::new(200, "Listing of resources").with_resource(ListingResource::shared()))
}

/// Creates a resource from the request body.
#[must_use]
pub fn create(callback: Callback) -> OperationBuilder {
    Operation::builder(callback)
        .kind(OperationKind::ResourceBody)
        .method(Method::POST)
        .summary("Create a new resource")
        .response(ResponseEntry::new(201, "{name} has been created"))
        .response(validation_failed())
}

/// Fetches a single resource.
#[must_use]
pub fn detail(callback: Callback) -> OperationBuilder {
    Operation::builder(callback)
        .path(resource_id())
        .method(Method::GET)
        .summary("Get specified resource.")
        .response(ResponseEntry::new(200, "Get a {name}"))
        .response(not_found())
}

/// Replaces a resource from the request body.
#[must_use]
pub fn update(callback: Callback) -> OperationBuilder {
    Operation::builder(callback)
        .kind(OperationKind::ResourceBody)
        .path(resource_id())
        .method(Method::PUT)
        .summary("Update specified resource.")
        .response(ResponseEntry::new(204, "{name} has been updated."))
        .response(validation_failed())
        .response(not_found())
}

/// Partially updates a resource from the request body.
#[must_use]
pub fn patch(callback: Callback) -> OperationBuilder {
    Operation::builder(callback)
        .kind(OperationKind::ResourceBody)
        .path(resource_id())
        .method(Method::PATCH)
        .summary("Patch specified resource.")
        .response(ResponseEntry::new(200, "{name} has been patched."))
        .response(validation_failed())
        .response(not_found())
}

/// Deletes a resource.
#[must_use]
pub fn delete(callback: Callback) -> OperationBuilder {
    Operation::builder(callback)
        .path(resource_id())
        .method(Method::DELETE)
        .summary("Delete specified resource.")
        .response(ResponseEntry::new(204, "{name} has been deleted.").without_schema())
        .response(not_found())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::meta::ResponseStatus;
    use crate::reply::Reply;
    use crate::resource::ResourceDef;

    fn noop(name: &str) -> Callback {
        Callback::new(name, |_| Ok(Reply::Empty))
    }

    fn explicit_statuses(op: &Operation) -> Vec<u16> {
        op.meta()
            .responses
            .keys()
            .filter_map(|status| match status {
                ResponseStatus::Code(code) => Some(*code),
                ResponseStatus::Default => None,
            })
            .collect()
    }

    #[test]
    fn test_delete_responses() {
        let op = delete(noop("delete_book")).build();
        assert_eq!(explicit_statuses(&op), vec![204, 404]);
        assert!(op.meta().responses.contains_key(&ResponseStatus::Default));
        assert!(op.methods().contains(&Method::DELETE));
        assert_eq!(op.url_path().render(), "{resource_id}");
    }

    #[test]
    fn test_conventional_shapes() {
        let cases = [
            (listing(noop("l")).build(), Method::GET, "", vec![200]),
            (create(noop("c")).build(), Method::POST, "", vec![201, 400]),
            (detail(noop("d")).build(), Method::GET, "{resource_id}", vec![200, 404]),
            (update(noop("u")).build(), Method::PUT, "{resource_id}", vec![204, 400, 404]),
            (patch(noop("p")).build(), Method::PATCH, "{resource_id}", vec![200, 400, 404]),
        ];
        for (op, method, path, statuses) in cases {
            assert_eq!(op.methods().len(), 1);
            assert!(op.methods().contains(&method), "{}", op.operation_id());
            assert_eq!(op.url_path().render(), path);
            assert_eq!(explicit_statuses(&op), statuses, "{}", op.operation_id());
        }
    }

    #[test]
    fn test_kinds() {
        assert!(matches!(listing(noop("l")).build().kind(), OperationKind::Listing(_)));
        assert_eq!(*create(noop("c")).build().kind(), OperationKind::ResourceBody);
        assert_eq!(*update(noop("u")).build().kind(), OperationKind::ResourceBody);
        assert_eq!(*patch(noop("p")).build().kind(), OperationKind::ResourceBody);
        assert_eq!(*detail(noop("d")).build().kind(), OperationKind::Plain);
        assert_eq!(*delete(noop("x")).build().kind(), OperationKind::Plain);
    }

    #[test]
    fn test_resource_id_is_integer_placeholder() {
        let op = detail(noop("d")).build();
        let params: Vec<_> = op.url_path().parameters().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].param_type, crate::doc::SchemaType::Integer);
    }

    #[test]
    fn test_create_description_uses_resource_name() {
        let op = create(noop("create_book"))
            .resource(Arc::new(ResourceDef::new("library.Book")))
            .build();
        let doc = op.to_documentation();
        assert_eq!(doc.responses["201"].description, "Book has been created");
        assert_eq!(doc.summary.as_deref(), Some("Create a new resource"));
    }

    #[test]
    fn test_summary_override() {
        let op = detail(noop("d")).summary("Fetch a book").build();
        assert_eq!(op.summary(), Some("Fetch a book"));
    }
}
