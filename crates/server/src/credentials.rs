/// Decides whether a username/password pair may open a session.
pub trait CredentialProvider: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured account.
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
