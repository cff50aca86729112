use async_trait::async_trait;

use crate::error::{ExpmodError, Result};
use crate::reference::{is_platform_native, parse_reference, RepositoryRef};

use super::RepoResolver;

/// Resolves paths that already name the hosting platform, without I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectResolver;

#[async_trait]
impl RepoResolver for DirectResolver {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn handles(&self, module_path: &str) -> bool {
        is_platform_native(module_path)
    }

    async fn resolve(&self, module_path: &str) -> Result<RepositoryRef> {
        let reference = parse_reference(module_path);
        if !reference.is_valid() {
            return Err(ExpmodError::InvalidReference {
                path: module_path.to_string(),
            });
        }
        Ok(reference)
    }
}
