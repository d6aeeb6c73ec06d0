use hexmac_core::{BridgeResponse, MethodCall};
use serde_json::Value;
use tauri::State;

use crate::BridgeState;

/// 前端调用的统一入口
///
/// 总是返回结果，失败时为 `{"error": {"code", "message"}}`
#[tauri::command]
pub async fn invoke_method(
    state: State<'_, BridgeState>,
    channel: Option<String>,
    method: String,
    arguments: Option<Value>,
) -> Result<BridgeResponse, String> {
    let call = MethodCall {
        channel,
        method,
        arguments,
    };
    Ok(state.router.handle(call).await)
}
