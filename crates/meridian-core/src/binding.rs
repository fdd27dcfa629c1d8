//! Owning containers and dispatch hooks.
//!
//! An [`Operation`](crate::Operation) may be bound once to an owner that
//! implements [`Binding`]. The owner supplies a fallback resource type, extra
//! tags and dispatch hooks, and is handed to the callback on execution.

use std::any::Any;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::operation::PathArgs;
use crate::reply::Reply;
use crate::request::Request;
use crate::resource::ResourceRef;

/// Hook run before execution. It may rewrite the path arguments in place.
pub type PreDispatch = Arc<dyn Fn(&dyn Request, &mut PathArgs) -> ApiResult<()> + Send + Sync>;

/// Hook run after execution. Its return value replaces the reply.
pub type PostDispatch = Arc<dyn Fn(&dyn Request, Reply) -> ApiResult<Reply> + Send + Sync>;

/// An owner that operations can be bound to.
pub trait Binding: Send + Sync + 'static {
    /// Resource used by bound operations that do not name their own.
    fn resource(&self) -> Option<ResourceRef> {
        None
    }

    /// Tags added to every bound operation. Read on each documentation pass.
    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Pre-dispatch hook for operations that do not carry their own.
    fn pre_dispatch(&self) -> Option<PreDispatch> {
        None
    }

    /// Post-dispatch hook for operations that do not carry their own.
    fn post_dispatch(&self) -> Option<PostDispatch> {
        None
    }

    /// Allows callbacks to recover the concrete owner type.
    fn as_any(&self) -> &dyn Any;
}
