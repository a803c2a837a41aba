//! Generated avatar URLs.

use super::{Client, percent_encode};

impl Client {
    /// URL of a generated initials avatar for the given display name.
    /// Derived locally; no request is made.
    pub fn initials_avatar_url(&self, name: &str) -> String {
        format!(
            "{}/avatars/initials?name={}&project={}",
            self.config.endpoint,
            percent_encode(name),
            percent_encode(&self.config.project_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_client;

    #[test]
    fn names_are_encoded_into_the_avatar_url() {
        let client = test_client();
        assert_eq!(
            client.initials_avatar_url("Ada Lovelace"),
            "https://backend.example.com/v1/avatars/initials?name=Ada%20Lovelace&project=proj%2D1"
        );
    }
}
