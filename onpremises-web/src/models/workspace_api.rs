use serde::Serialize;

/// Identity and access endpoints of a workspace, as returned to API clients.
///
/// `public_url` and `shareable_url` start as empty strings so they serialize as
/// `""` rather than `null` when the workspace is neither public nor shared.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceApiResponse {
    id: i64,
    name: Option<String>,
    description: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    private_url: Option<String>,
    public_url: String,
    shareable_url: String,
}

impl WorkspaceApiResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn set_api_secret(&mut self, api_secret: impl Into<String>) {
        self.api_secret = Some(api_secret.into());
    }

    pub fn private_url(&self) -> Option<&str> {
        self.private_url.as_deref()
    }

    pub fn set_private_url(&mut self, private_url: impl Into<String>) {
        self.private_url = Some(private_url.into());
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn set_public_url(&mut self, public_url: impl Into<String>) {
        self.public_url = public_url.into();
    }

    pub fn shareable_url(&self) -> &str {
        &self.shareable_url
    }

    pub fn set_shareable_url(&mut self, shareable_url: impl Into<String>) {
        self.shareable_url = shareable_url.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_response_has_empty_public_and_shareable_urls() {
        let response = WorkspaceApiResponse::new();
        assert_eq!(response.public_url(), "");
        assert_eq!(response.shareable_url(), "");
        assert!(response.private_url().is_none());
    }

    #[test]
    fn urls_serialize_as_empty_strings_not_null() {
        let mut response = WorkspaceApiResponse::new();
        response.set_id(1);
        response.set_name("Big Bank plc");
        response.set_private_url("http://localhost:8080/workspace/1");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["privateUrl"], "http://localhost:8080/workspace/1");
        assert_eq!(json["publicUrl"], "");
        assert_eq!(json["shareableUrl"], "");
    }
}
