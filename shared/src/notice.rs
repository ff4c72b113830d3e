/// User-facing messages raised by this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoginRequired,
    /// The server answered but refused the favorite change.
    FavoriteRejected,
    /// The favorite request never completed or its answer was unreadable.
    FavoriteFailed,
    ReviewPosted(String),
    ReviewFailed,
    ReviewTargetMissing,
}

pub const REVIEW_POSTED_DEFAULT: &str = "口コミが投稿されました！";

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::LoginRequired => "ログインまたは会員登録が必要です",
            Notice::FavoriteRejected => "操作に失敗しました。",
            Notice::FavoriteFailed => "エラーが発生しました。",
            Notice::ReviewPosted(message) => message,
            Notice::ReviewFailed => "口コミの投稿に失敗しました。",
            Notice::ReviewTargetMissing => "Playground IDが見つかりません。",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::ReviewPosted(_))
    }
}
