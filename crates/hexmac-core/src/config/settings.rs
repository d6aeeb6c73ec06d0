use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 主窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Label of the window whose capture visibility is controlled
    #[serde(default = "default_window_label")]
    pub label: String,
    /// Hide the window from screen capture as soon as it is created
    #[serde(default)]
    pub start_hidden: bool,
    #[serde(default = "default_true")]
    pub always_on_top: bool,
    #[serde(default = "default_true")]
    pub visible_on_all_workspaces: bool,
}

fn default_window_label() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            label: default_window_label(),
            start_hidden: false,
            always_on_top: true,
            visible_on_all_workspaces: true,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "hexmac=debug,hexmac_lib=debug,hexmac_core=debug,tauri=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
