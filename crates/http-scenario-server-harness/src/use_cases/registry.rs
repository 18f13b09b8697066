use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{BoxedMatcher, Endpoint, Method, Scenario};
use crate::error::HarnessError;

/// Endpoints declared for one mock server, keyed by method and path.
///
/// Registering the same method and path again appends a scenario to the
/// existing endpoint. Endpoints keep their registration order.
#[derive(Debug, Default)]
pub struct Registry {
    endpoints: Vec<Endpoint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario to the endpoint for `method` and `path`, creating the
    /// endpoint on first use
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        matchers: impl IntoIterator<Item = BoxedMatcher>,
    ) -> &mut Scenario {
        let index = match self
            .endpoints
            .iter()
            .position(|e| e.method() == method && e.path() == path)
        {
            Some(index) => index,
            None => {
                self.endpoints.push(Endpoint::new(method, path));
                self.endpoints.len() - 1
            }
        };
        self.endpoints[index].add_scenario(matchers)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Validate every path and scenario, then freeze each endpoint's response plan
    pub fn freeze(self) -> Result<Vec<Arc<Endpoint>>, HarnessError> {
        let mut shapes: HashMap<String, &str> = HashMap::new();
        for endpoint in &self.endpoints {
            let path = endpoint.path();
            validate_path(path)?;
            let other = *shapes.entry(route_shape(path)).or_insert(path);
            if other != path {
                return Err(HarnessError::ConfigurationError(format!(
                    "paths {other} and {path} differ only in capture names"
                )));
            }

            for (index, scenario) in endpoint.scenarios().iter().enumerate() {
                if scenario.expected_times() == 0 {
                    return Err(HarnessError::ConfigurationError(format!(
                        "scenario {} of {} expects 0 calls, times must be at least 1",
                        index + 1,
                        endpoint.name()
                    )));
                }
            }
        }

        Ok(self
            .endpoints
            .into_iter()
            .map(|mut endpoint| {
                endpoint.freeze();
                Arc::new(endpoint)
            })
            .collect())
    }
}

fn validate_path(path: &str) -> Result<(), HarnessError> {
    if !path.starts_with('/') {
        return Err(HarnessError::ConfigurationError(format!(
            "path {path:?} must start with `/`"
        )));
    }
    for segment in path.split('/') {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(HarnessError::ConfigurationError(format!(
                "path {path:?} uses `{segment}`, captures are written `{{name}}` or `{{*name}}`"
            )));
        }
    }
    Ok(())
}

/// The path with every capture name erased: `/users/{id}` becomes `/users/{}`
fn route_shape(path: &str) -> String {
    let mut shape = String::with_capacity(path.len());
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        shape.push(c);
        if c == '{' {
            let capture: String = chars.by_ref().take_while(|&c| c != '}').collect();
            if capture.starts_with('*') {
                shape.push('*');
            }
            shape.push('}');
        }
    }
    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_merges_same_method_and_path() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "/isbn", []).times(2);
        registry.register(Method::Get, "/isbn", []);
        registry.register(Method::Post, "/isbn", []);

        assert_eq!(registry.endpoints().len(), 2);
        assert_eq!(registry.endpoints()[0].scenarios().len(), 2);
        assert_eq!(registry.endpoints()[1].method(), Method::Post);
    }

    #[test]
    fn test_registry_freeze_builds_plans() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "/isbn", []).times(2);
        registry.register(Method::Get, "/isbn", []);

        let endpoints = registry.freeze().unwrap();
        assert_eq!(endpoints[0].plan(), &[0, 0, 1]);
    }

    #[test]
    fn test_registry_rejects_zero_times() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "/never", []).times(0);

        let result = registry.freeze();
        assert!(matches!(result, Err(HarnessError::ConfigurationError(_))));
    }

    #[test]
    fn test_registry_rejects_path_without_leading_slash() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "get", []);

        let result = registry.freeze();
        assert!(matches!(result, Err(HarnessError::ConfigurationError(_))));
    }

    #[test]
    fn test_registry_rejects_colon_captures() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "/users/:id", []);

        let result = registry.freeze();
        assert!(matches!(result, Err(HarnessError::ConfigurationError(_))));
    }

    #[test]
    fn test_registry_rejects_paths_differing_in_capture_names() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "/users/{id}", []);
        registry.register(Method::Delete, "/users/{user_id}", []);

        let result = registry.freeze();
        assert!(matches!(result, Err(HarnessError::ConfigurationError(_))));
    }

    #[test]
    fn test_registry_accepts_same_capture_under_several_methods() {
        let mut registry = Registry::new();
        registry.register(Method::Get, "/users/{id}", []);
        registry.register(Method::Delete, "/users/{id}", []);
        registry.register(Method::Get, "/files/{*rest}", []);

        assert_eq!(registry.freeze().unwrap().len(), 3);
    }

    #[test]
    fn test_route_shape_erases_capture_names() {
        assert_eq!(route_shape("/users/{id}/books"), "/users/{}/books");
        assert_eq!(route_shape("/files/{*rest}"), "/files/{*}");
        assert_eq!(route_shape("/static"), "/static");
    }
}
