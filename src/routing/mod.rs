//! Routing module
//!
//! Provides the explicit routing table and assembles the application's
//! routes from configuration.

mod table;

pub use table::{
    allow_header, join_path, normalize_path, Handler, RouteMatch, RouteTable,
};

use hyper::Method;

use crate::cats;
use crate::config::RoutesConfig;
use crate::error::Result;
use crate::handler::health;

/// Build the application routing table
///
/// Mounts the `cats` resource under `routes.prefix` and, when enabled,
/// the health probes at their configured absolute paths.
pub fn build_route_table(routes: &RoutesConfig) -> Result<RouteTable> {
    let mut table = RouteTable::new();

    cats::register(&mut table, &routes.prefix)?;

    if routes.health.enabled {
        table
            .route(Method::GET, &routes.health.liveness_path, health::liveness)?
            .route(Method::GET, &routes.health.readiness_path, health::readiness)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ServerError;

    fn routes(toml: &str) -> RoutesConfig {
        Config::from_toml(toml).unwrap().routes
    }

    #[test]
    fn test_default_table() {
        let table = build_route_table(&routes("")).unwrap();
        assert_eq!(table.len(), 4);
        assert!(matches!(table.resolve(&Method::GET, "/cats"), RouteMatch::Found(_)));
        assert!(matches!(table.resolve(&Method::POST, "/cats"), RouteMatch::Found(_)));
        assert!(matches!(table.resolve(&Method::GET, "/healthz"), RouteMatch::Found(_)));
        assert!(matches!(table.resolve(&Method::GET, "/readyz"), RouteMatch::Found(_)));
    }

    #[test]
    fn test_prefix_and_disabled_health() {
        let table = build_route_table(&routes(
            "[routes]\nprefix = \"/api\"\n[routes.health]\nenabled = false",
        ))
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(matches!(table.resolve(&Method::GET, "/api/cats"), RouteMatch::Found(_)));
        assert!(matches!(table.resolve(&Method::GET, "/cats"), RouteMatch::NotFound));
        assert!(matches!(table.resolve(&Method::GET, "/healthz"), RouteMatch::NotFound));
    }

    #[test]
    fn test_health_path_clash_is_an_error() {
        let result = build_route_table(&routes(
            "[routes.health]\nliveness_path = \"/cats\"",
        ));
        assert!(matches!(result, Err(ServerError::DuplicateRoute { .. })));
    }
}
