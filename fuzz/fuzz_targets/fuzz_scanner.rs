#![no_main]

use libfuzzer_sys::fuzz_target;
use rotor_core::parser::scanner::Scanner;

fuzz_target!(|data: &[u8]| {
    // The scanner consumes UTF-8 source text.
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let mut scanner = Scanner::new(source);
    let tokens = scanner.tokenize();

    // Every token must slice cleanly out of the source and stay inside it.
    for token in &tokens {
        let raw = token.loc.slice(source);
        assert!(raw.len() <= source.len(), "token slice escapes the source");
        assert!(token.loc.line >= 1, "line numbers are 1-based");
    }
});
