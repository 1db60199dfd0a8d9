use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::error::WebError;

/// Who a bearer token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    HouseLeader,
}

/// The authenticated key, stored in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct Caller {
    pub role: Role,
    pub key: Arc<str>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    admin: Arc<HashSet<String>>,
    house_leader: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn new(admin_keys: &str, house_leader_keys: &str) -> Self {
        Self {
            admin: Arc::new(split_keys(admin_keys)),
            house_leader: Arc::new(split_keys(house_leader_keys)),
        }
    }

    /// A key listed under both roles counts as admin.
    pub fn role_of(&self, key: &str) -> Option<Role> {
        if self.admin.contains(key) {
            Some(Role::Admin)
        } else if self.house_leader.contains(key) {
            Some(Role::HouseLeader)
        } else {
            None
        }
    }
}

fn split_keys(keys_str: &str) -> HashSet<String> {
    keys_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authorize(
    api_keys: &ApiKeys,
    headers: &HeaderMap,
    allowed: &[Role],
) -> Result<Caller, WebError> {
    let token = bearer_token(headers).ok_or(WebError::Unauthorized)?;

    let Some(role) = api_keys.role_of(token) else {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    };

    if allowed.contains(&role) {
        Ok(Caller {
            role,
            key: Arc::from(token),
        })
    } else {
        tracing::warn!(?role, "API key lacks the required role");
        Err(WebError::Forbidden)
    }
}

pub async fn require_admin(
    State(api_keys): State<ApiKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let caller = authorize(&api_keys, req.headers(), &[Role::Admin])?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// House leaders and administrators; handlers narrow leaders to their house.
pub async fn require_house_leader(
    State(api_keys): State<ApiKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let caller = authorize(&api_keys, req.headers(), &[Role::Admin, Role::HouseLeader])?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn keys() -> ApiKeys {
        ApiKeys::new(" admin-1, admin-2 ,,", "leader-1")
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_roles_from_comma_separated_keys() {
        let keys = keys();
        assert_eq!(keys.role_of("admin-2"), Some(Role::Admin));
        assert_eq!(keys.role_of("leader-1"), Some(Role::HouseLeader));
        assert_eq!(keys.role_of(""), None);
        assert_eq!(keys.role_of("nobody"), None);
    }

    #[test]
    fn test_admin_key_listed_twice_is_admin() {
        let keys = ApiKeys::new("shared", "shared");
        assert_eq!(keys.role_of("shared"), Some(Role::Admin));
    }

    #[test]
    fn test_missing_or_malformed_header_is_unauthorized() {
        let keys = keys();
        assert!(matches!(
            authorize(&keys, &HeaderMap::new(), &[Role::Admin]),
            Err(WebError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&keys, &headers("Basic admin-1"), &[Role::Admin]),
            Err(WebError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&keys, &headers("Bearer wrong"), &[Role::Admin]),
            Err(WebError::Unauthorized)
        ));
    }

    #[test]
    fn test_house_leader_cannot_use_admin_routes() {
        let keys = keys();
        assert!(matches!(
            authorize(&keys, &headers("Bearer leader-1"), &[Role::Admin]),
            Err(WebError::Forbidden)
        ));
        let leader =
            authorize(&keys, &headers("Bearer leader-1"), &[Role::Admin, Role::HouseLeader])
                .unwrap();
        assert_eq!(leader.role, Role::HouseLeader);
        assert_eq!(&*leader.key, "leader-1");

        let admin =
            authorize(&keys, &headers("Bearer admin-1"), &[Role::Admin, Role::HouseLeader])
                .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
