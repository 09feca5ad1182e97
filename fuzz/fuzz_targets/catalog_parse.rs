#![no_main]

use libfuzzer_sys::fuzz_target;
use docgate_retrieval::Catalog;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // 순환/중복/존재하지 않는 부모가 있어도 패닉 없이 에러만 반환해야 함
        let _ = Catalog::parse(content);
    }
});
