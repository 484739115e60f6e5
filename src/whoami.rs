use serde::Deserialize;

/// The parts of the GitHub `/user` response that `whoami` prints.
#[derive(Deserialize, Debug, PartialEq)]
pub struct UserResponse {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserResponse {
    /// `login` alone, or `login (Display Name)` when a name is set.
    pub fn display(&self) -> String {
        match self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => format!("{} ({})", self.login, name.trim()),
            None => self.login.clone(),
        }
    }
}

/// Parses a GitHub `/user` API JSON response string.
pub fn parse_user_response(json: &str) -> anyhow::Result<UserResponse> {
    serde_json::from_str::<UserResponse>(json)
        .map_err(|e| anyhow::anyhow!("Failed to parse user response: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_login_only() {
        let user = parse_user_response(r#"{"login":"octocat","id":1}"#).unwrap();
        assert_eq!(user.display(), "octocat");
    }

    #[test]
    fn test_parse_user_with_name() {
        let user = parse_user_response(r#"{"login":"octocat","id":1,"name":"The Octocat"}"#).unwrap();
        assert_eq!(user.display(), "octocat (The Octocat)");
    }

    #[test]
    fn test_parse_user_blank_name() {
        let user = parse_user_response(r#"{"login":"octocat","id":1,"name":"  "}"#).unwrap();
        assert_eq!(user.display(), "octocat");
    }

    #[test]
    fn test_parse_user_invalid_json() {
        assert!(parse_user_response("{ invalid json }").is_err());
    }

    #[test]
    fn test_parse_user_missing_field() {
        assert!(parse_user_response(r#"{"id":1}"#).is_err());
    }
}
