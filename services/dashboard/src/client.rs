//! Client identification cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

/// Cookie carrying the client id
pub const CLIENT_COOKIE: &str = "cb_client";

/// Client id carried by the request, if well formed
pub fn current_client(jar: &CookieJar) -> Option<String> {
    jar.get(CLIENT_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .map(|id| id.to_string())
}

/// Read the client id, issuing a fresh cookie when it is missing or malformed
pub fn ensure_client(jar: CookieJar) -> (CookieJar, String) {
    match current_client(&jar) {
        Some(id) => (jar, id),
        None => issue_client(jar),
    }
}

/// Replace whatever client id the request carried with a new one
pub fn issue_client(jar: CookieJar) -> (CookieJar, String) {
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((CLIENT_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_client_is_kept() {
        let id = Uuid::new_v4().to_string();
        let jar = CookieJar::new().add(Cookie::new(CLIENT_COOKIE, id.clone()));

        let (jar, client) = ensure_client(jar);
        assert_eq!(client, id);
        assert_eq!(jar.get(CLIENT_COOKIE).map(|c| c.value().to_string()), Some(id));
    }

    #[test]
    fn test_missing_client_gets_new_id() {
        let (jar, client) = ensure_client(CookieJar::new());

        assert!(Uuid::parse_str(&client).is_ok());
        let cookie = jar.get(CLIENT_COOKIE).expect("cookie issued");
        assert_eq!(cookie.value(), client);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_issued_client_replaces_existing() {
        let old = Uuid::new_v4().to_string();
        let jar = CookieJar::new().add(Cookie::new(CLIENT_COOKIE, old.clone()));

        let (jar, client) = issue_client(jar);
        assert_ne!(client, old);
        assert_eq!(current_client(&jar), Some(client));
    }

    #[test]
    fn test_malformed_client_is_replaced() {
        let jar = CookieJar::new().add(Cookie::new(CLIENT_COOKIE, "../../etc"));

        let (_, client) = ensure_client(jar);
        assert_ne!(client, "../../etc");
        assert!(Uuid::parse_str(&client).is_ok());
    }
}
