/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - guard 側で自分の失敗種別に変換する (ここは HTTP を知らない)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
