#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use docgate_retrieval::excerpt::{Excerpter, TruncatingExcerpter};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    content: String,
    /// 발췌 최대 길이 (6 미만은 생성 단계에서 거부됨)
    max_size: u16,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(excerpter) = TruncatingExcerpter::new(usize::from(input.max_size)) else {
        return;
    };
    let excerpt = excerpter.excerpt(&input.content);

    // 잘린 발췌는 앞/뒤 절반 + "..." 이하의 길이
    let half = usize::from(input.max_size) / 2;
    assert!(excerpt.chars().count() <= usize::from(input.max_size).max(half * 2 + 3));
});
