use serde::{Deserialize, Serialize};

use crate::features::leaderboard::{LeaderboardOptions, Participant};

/// 排行榜渲染请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderLeaderboardRequest {
    /// 参与者（顺序即名次）
    pub participants: Vec<Participant>,
    /// 仅渲染前 N 条（缺省或 0 表示全部）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// 样式选项
    #[serde(default)]
    pub options: LeaderboardOptions,
}
