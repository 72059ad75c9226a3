pub mod component;

pub use component::{InMemoryWorkspaceComponent, WorkspaceComponent};

use crate::config::WorkspaceSettings;
use crate::security::User;
use secrecy::Secret;

/// Per-workspace access lists, as consulted by the access checks.
pub trait WorkspaceAccess {
    fn has_no_users_configured(&self) -> bool;
    fn is_write_user(&self, user: Option<&User>) -> bool;
    fn is_read_user(&self, user: Option<&User>) -> bool;
}

/// Open workspace, write user, or read user. Write does not imply read: each
/// list is consulted on its own.
pub fn can_access_workspace(user: Option<&User>, workspace: &impl WorkspaceAccess) -> bool {
    workspace.has_no_users_configured()
        || workspace.is_write_user(user)
        || workspace.is_read_user(user)
}

pub fn can_write_workspace(user: Option<&User>, workspace: &impl WorkspaceAccess) -> bool {
    workspace.has_no_users_configured() || workspace.is_write_user(user)
}

#[derive(Debug, Clone)]
pub struct WorkspaceMetadata {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    pub read_users: Vec<String>,
    pub write_users: Vec<String>,
    pub public: bool,
    pub sharing_token: Option<String>,
}

impl WorkspaceMetadata {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            api_key: String::new(),
            api_secret: Secret::new(String::new()),
            read_users: Vec::new(),
            write_users: Vec::new(),
            public: false,
            sharing_token: None,
        }
    }

    pub fn is_shareable(&self) -> bool {
        self.sharing_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

impl From<WorkspaceSettings> for WorkspaceMetadata {
    fn from(settings: WorkspaceSettings) -> Self {
        Self {
            id: settings.id,
            name: settings.name,
            description: settings.description,
            api_key: settings.api_key,
            api_secret: settings.api_secret,
            read_users: settings.read_users,
            write_users: settings.write_users,
            public: settings.public,
            sharing_token: settings.sharing_token,
        }
    }
}

fn listed(users: &[String], user: Option<&User>) -> bool {
    match user {
        Some(user) => users.iter().any(|name| user.matches(name)),
        None => false,
    }
}

impl WorkspaceAccess for WorkspaceMetadata {
    fn has_no_users_configured(&self) -> bool {
        self.read_users.is_empty() && self.write_users.is_empty()
    }

    fn is_write_user(&self, user: Option<&User>) -> bool {
        listed(&self.write_users, user)
    }

    fn is_read_user(&self, user: Option<&User>) -> bool {
        listed(&self.read_users, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace(read: &[&str], write: &[&str]) -> WorkspaceMetadata {
        let mut workspace = WorkspaceMetadata::new(1, "Big Bank plc");
        workspace.read_users = read.iter().map(|s| s.to_string()).collect();
        workspace.write_users = write.iter().map(|s| s.to_string()).collect();
        workspace
    }

    #[test]
    fn open_workspace_admits_everyone() {
        let open = workspace(&[], &[]);
        assert!(can_access_workspace(None, &open));
        assert!(can_access_workspace(Some(&User::new("bob")), &open));
        assert!(can_write_workspace(None, &open));
    }

    #[test]
    fn write_user_only() {
        let ws = workspace(&[], &["alice"]);
        assert!(can_access_workspace(Some(&User::new("alice")), &ws));
        assert!(!can_access_workspace(Some(&User::new("bob")), &ws));
        assert!(!can_access_workspace(None, &ws));
    }

    #[test]
    fn read_user_only() {
        let ws = workspace(&["carol"], &[]);
        let carol = User::new("carol");
        assert!(can_access_workspace(Some(&carol), &ws));
        assert!(!can_write_workspace(Some(&carol), &ws));
    }

    #[test]
    fn write_does_not_imply_read() {
        let ws = workspace(&["carol"], &["alice"]);
        let alice = User::new("alice");
        assert!(ws.is_write_user(Some(&alice)));
        assert!(!ws.is_read_user(Some(&alice)));
        assert!(can_access_workspace(Some(&alice), &ws));
    }

    #[test]
    fn roles_grant_access() {
        let ws = workspace(&["auditors"], &[]);
        let dave = User::new("dave").with_role("auditors");
        assert!(can_access_workspace(Some(&dave), &ws));
    }

    #[test]
    fn empty_sharing_token_is_not_shareable() {
        let mut ws = workspace(&[], &[]);
        assert!(!ws.is_shareable());
        ws.sharing_token = Some(String::new());
        assert!(!ws.is_shareable());
        ws.sharing_token = Some("abc".to_string());
        assert!(ws.is_shareable());
    }
}
