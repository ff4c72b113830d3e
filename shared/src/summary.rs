use serde::Deserialize;

use crate::error::TransportError;

pub const SUMMARY_FAILED: &str =
    "口コミの要約の取得に失敗しました。時間をおいて再度お試しください。";
pub const SUMMARY_UNAVAILABLE: &str = "要約の表示に必要な情報を取得できませんでした。";

/// Body of the review-summary endpoint. Errors come back as `{error}` with a non-OK status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SummaryReply {
    pub summary: Option<String>,
    pub error: Option<String>,
}

/// Text to show in the summary panel for a fetch result.
pub fn summary_text(result: Result<SummaryReply, TransportError>) -> String {
    result
        .ok()
        .and_then(|reply| reply.summary)
        .filter(|summary| !summary.trim().is_empty())
        .unwrap_or_else(|| SUMMARY_FAILED.to_owned())
}
