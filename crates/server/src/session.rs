use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use std::convert::Infallible;

pub const SESSION_COOKIE: &str = "session";
/// Minimum secret length accepted by the key derivation.
pub const MIN_SECRET_LEN: usize = 32;

const LOGGED_IN: &str = "logged_in";

/// Build the cookie signing key from the configured secret.
///
/// Without a secret a random key is generated, so sessions end on restart.
pub fn cookie_key(secret: Option<&str>) -> anyhow::Result<Key> {
    match secret {
        Some(secret) if secret.len() >= MIN_SECRET_LEN => Ok(Key::derive_from(secret.as_bytes())),
        Some(_) => anyhow::bail!("session secret must be at least {MIN_SECRET_LEN} bytes long"),
        None => {
            tracing::warn!("SESSION_SECRET not set - using a random key, sessions end on restart");
            Ok(Key::generate())
        }
    }
}

/// Per-client login state carried in a signed cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    logged_in: bool,
}

impl Session {
    pub fn from_jar(jar: &SignedCookieJar) -> Self {
        let logged_in = jar
            .get(SESSION_COOKIE)
            .is_some_and(|cookie| cookie.value() == LOGGED_IN);
        Self { logged_in }
    }

    pub fn is_authenticated(&self) -> bool {
        self.logged_in
    }

    pub fn start(jar: SignedCookieJar) -> SignedCookieJar {
        jar.add(
            Cookie::build((SESSION_COOKIE, LOGGED_IN))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    }

    pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await?;
        Ok(Self::from_jar(&jar))
    }
}
