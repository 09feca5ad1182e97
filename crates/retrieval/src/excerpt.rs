//! 본문 발췌
//!
//! `documents`/`documents-markdown` 모드는 본문 전체 대신 짧은 발췌를 출력합니다.
//! 연속된 공백과 `<br/>` 토큰을 공백 하나로 접은 뒤, 너무 길면 앞뒤 절반씩만
//! 남기고 가운데를 `...`로 잘라냅니다.

use regex::Regex;

use crate::error::RetrievalError;

/// 기본 발췌 최대 길이 (문자 수)
pub const DEFAULT_EXCERPT_SIZE: usize = 50;

/// 허용되는 최소 발췌 길이
pub const MIN_EXCERPT_SIZE: usize = 6;

const COLLAPSE_PATTERN: &str = r"(\s|<br/>)+";

/// 본문을 출력용 발췌로 줄이는 trait
pub trait Excerpter: Send + Sync {
    /// 본문에서 발췌를 만듭니다.
    fn excerpt(&self, content: &str) -> String;
}

/// 공백을 접고 가운데를 잘라내는 기본 발췌기
#[derive(Debug, Clone)]
pub struct TruncatingExcerpter {
    max_size: usize,
    collapse: Regex,
}

impl TruncatingExcerpter {
    /// 최대 길이를 지정해 발췌기를 생성합니다.
    ///
    /// # Errors
    /// `max_size`가 [`MIN_EXCERPT_SIZE`]보다 작으면 `RetrievalError::Config`
    pub fn new(max_size: usize) -> Result<Self, RetrievalError> {
        if max_size < MIN_EXCERPT_SIZE {
            return Err(RetrievalError::Config {
                field: "snippet_max_size".to_owned(),
                reason: format!("must be >= {MIN_EXCERPT_SIZE}, got {max_size}"),
            });
        }
        let collapse = Regex::new(COLLAPSE_PATTERN).map_err(|e| RetrievalError::Config {
            field: "snippet_max_size".to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { max_size, collapse })
    }

    /// 최대 길이
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Excerpter for TruncatingExcerpter {
    fn excerpt(&self, content: &str) -> String {
        let collapsed = self.collapse.replace_all(content, " ");
        let total = collapsed.chars().count();
        if total <= self.max_size {
            return collapsed.into_owned();
        }

        let half = self.max_size / 2;
        let head: String = collapsed.chars().take(half).collect();
        let tail: String = collapsed.chars().skip(total - half).collect();
        format!("{head}...{tail}")
    }
}

/// 단발성 발췌 함수
///
/// # Errors
/// `max_size < 6`이면 `RetrievalError::Config`
pub fn snippet_of(content: &str, max_size: usize) -> Result<String, RetrievalError> {
    Ok(TruncatingExcerpter::new(max_size)?.excerpt(content))
}
