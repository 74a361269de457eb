//! Display implementation for application messages.
//!
//! The single source of truth for all user-facing text. API-visible strings
//! stay byte-identical to what the bundled web UI matches on, so they must
//! not be reworded casually.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // Sleep sessions
            Message::SleepStarted => "开始睡眠".to_string(),
            Message::SleepRestarted => "睡眠记录已更新".to_string(),
            Message::SleepCompleted => "睡眠记录完成".to_string(),
            Message::SleepEndedWithoutStart => "未有睡眠记录，已记录起床时间".to_string(),
            Message::SleepCustomAdded => "睡眠记录已添加".to_string(),

            // Meals
            Message::MealLogged => "吃饭时间已记录".to_string(),
            Message::MealCustomAdded => "饮食记录已添加".to_string(),

            // Shared API messages
            Message::RecordDeleted => "删除成功".to_string(),
            Message::RecordNotFound => "记录不存在".to_string(),
            Message::MissingRequiredParams => "缺少必需参数".to_string(),
            Message::InvalidRecordType => "无效的记录类型".to_string(),
            Message::InvalidTimestamp(value) => format!("无法解析的时间戳: {}", value),
            Message::InvalidWindowDays(days) => format!("无效的统计天数: {}", days),

            // Storage
            Message::DbError => "数据库错误".to_string(),
            Message::QueryFailed => "查询失败".to_string(),
            Message::InsertFailed => "插入失败".to_string(),
            Message::UpdateFailed => "更新失败".to_string(),
            Message::DeleteFailed => "删除失败".to_string(),

            // Configuration
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),

            // Server lifecycle
            Message::ServerListening(addr) => format!("Server listening on http://{}", addr),
            Message::ServerShutdown => "Server shut down".to_string(),
        };
        write!(f, "{}", text)
    }
}
