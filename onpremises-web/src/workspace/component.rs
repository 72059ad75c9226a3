use super::WorkspaceMetadata;
use async_trait::async_trait;
use std::collections::BTreeMap;
use web_core::error::AppError;

/// Read access to workspace metadata.
#[async_trait]
pub trait WorkspaceComponent: Send + Sync {
    /// All workspaces, ordered by id.
    async fn get_workspaces(&self) -> Result<Vec<WorkspaceMetadata>, AppError>;

    async fn get_workspace_metadata(&self, id: i64) -> Result<Option<WorkspaceMetadata>, AppError>;
}

/// Workspaces declared in configuration, fixed for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceComponent {
    workspaces: BTreeMap<i64, WorkspaceMetadata>,
}

impl InMemoryWorkspaceComponent {
    pub fn new(workspaces: impl IntoIterator<Item = WorkspaceMetadata>) -> Self {
        let mut map = BTreeMap::new();
        for workspace in workspaces {
            if map.contains_key(&workspace.id) {
                tracing::warn!(workspace_id = workspace.id, "Duplicate workspace id; keeping the last definition");
            }
            map.insert(workspace.id, workspace);
        }
        Self { workspaces: map }
    }
}

#[async_trait]
impl WorkspaceComponent for InMemoryWorkspaceComponent {
    async fn get_workspaces(&self) -> Result<Vec<WorkspaceMetadata>, AppError> {
        Ok(self.workspaces.values().cloned().collect())
    }

    async fn get_workspace_metadata(&self, id: i64) -> Result<Option<WorkspaceMetadata>, AppError> {
        Ok(self.workspaces.get(&id).cloned())
    }
}
