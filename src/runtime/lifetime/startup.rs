use crate::cache::{ObjectCache, create_cache, register_builtin_plugins};
use crate::config::{AppConfig, GradingConfig};
use crate::errors::{GradebookError, Result};
use crate::grading::LetterScale;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 准备服务器启动的上下文
/// 包括存储（含数据库迁移）和缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已安装过时返回 Err，可忽略
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = AppConfig::get();
    if config.jwt.secret.is_empty() {
        return Err(GradebookError::authentication(
            "jwt.secret is not configured (set JWT_SECRET)",
        ));
    }
    check_grading_scales(&config.grading)?;
    if config.demo_fallback_enabled() {
        warn!("Demo grade fallback is enabled, gradebook may show random data on storage errors");
    }

    register_builtin_plugins();
    debug!("Cache plugins registered");

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 创建缓存实例
    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

/// 配置中的等级制名称必须有效
fn check_grading_scales(grading: &GradingConfig) -> Result<()> {
    for (key, name) in [
        ("grading.class_scale", &grading.class_scale),
        ("grading.report_scale", &grading.report_scale),
    ] {
        LetterScale::from_name(name)
            .map_err(|e| GradebookError::validation(format!("{key}: {}", e.message())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grading(class_scale: &str, report_scale: &str) -> GradingConfig {
        GradingConfig {
            class_scale: class_scale.to_string(),
            report_scale: report_scale.to_string(),
            demo_fallback: false,
        }
    }

    #[test]
    fn test_check_grading_scales() {
        assert!(check_grading_scales(&grading("simple", "plus_minus")).is_ok());

        let err = check_grading_scales(&grading("simple", "plus_minux")).unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(err.message().starts_with("grading.report_scale"));

        let err = check_grading_scales(&grading("letters", "simple")).unwrap_err();
        assert!(err.message().starts_with("grading.class_scale"));
    }
}
