#![no_main]

use libfuzzer_sys::fuzz_target;
use rotor_core::parser::ast::StmtData;
use rotor_core::parser::Parser;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must terminate on arbitrary input and always yield a program
    // root, with the error flag as the only failure channel.
    let mut parser = Parser::new(source);
    let program = parser.parse();
    assert!(
        matches!(program.data, StmtData::Program(_)),
        "root node must be a program"
    );
});
