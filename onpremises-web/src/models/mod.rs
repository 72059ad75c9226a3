pub mod page;
pub mod workspace_api;

pub use page::{PageModel, SiteConfiguration, Version};
pub use workspace_api::WorkspaceApiResponse;
