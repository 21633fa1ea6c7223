//! Canonical resource paths for `Location` headers.

use actix_web::HttpRequest;
use thiserror::Error;

/// Errors building a resource path.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The route is not registered, or the parameters do not fit it.
    #[error("Cannot build link for route '{route}': {reason}")]
    Unresolvable { route: String, reason: String },
}

/// Produces the canonical path of a named route.
///
/// `params` fill the route's dynamic segments in order, e.g. for
/// `/api/camps/{moniker}/talks/{id}` pass `[moniker, id]`.
pub trait LinkBuilder {
    fn path_for(&self, route: &str, params: &[String]) -> Result<String, LinkError>;
}

/// Resolves routes registered with `.name(..)` on the running app.
impl LinkBuilder for HttpRequest {
    fn path_for(&self, route: &str, params: &[String]) -> Result<String, LinkError> {
        self.url_for(route, params)
            .map(|url| url.path().to_string())
            .map_err(|e| LinkError::Unresolvable {
                route: route.to_string(),
                reason: e.to_string(),
            })
    }
}
