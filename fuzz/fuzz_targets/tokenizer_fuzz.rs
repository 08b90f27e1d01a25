#![no_main]
use libfuzzer_sys::fuzz_target;
use retro::Tokenizer;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let tokenizer = Tokenizer::standard().unwrap();
    let lines = tokenizer.tokenize(source);
    assert_eq!(lines.len(), source.lines().count());
    for token in lines.iter().flatten() {
        assert!(!token.is_empty());
        assert!(!token.chars().any(char::is_whitespace));
    }
    let _ = tokenizer.unmatched(source);
});
