use hexmac_core::config::{self, AppConfig};
use tauri::State;

use crate::AppState;

/// 获取当前配置
#[tauri::command]
pub async fn get_config(state: State<'_, AppState>) -> Result<AppConfig, String> {
    let config = state.config.read().await;
    Ok(config.clone())
}

/// 保存配置（窗口设置在下次启动时生效）
#[tauri::command]
pub async fn save_config(state: State<'_, AppState>, config: AppConfig) -> Result<(), String> {
    config::save_config(&config).map_err(|e| e.to_string())?;

    let mut current_config = state.config.write().await;
    *current_config = config;

    tracing::info!("Config saved and updated");
    Ok(())
}
