//! Interactive shell backed by rustyline.

use std::io;

use anyhow::Result;
use rotor_core::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Runs the read-eval-print loop until end-of-file.
///
/// Lines accumulate into one program unit: a blank line extends the pending
/// unit without executing it, and any other line completes the unit, which
/// is then evaluated as a whole.  Interpreter state persists across units,
/// and errors never end the session.
pub fn run() -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut stdout = io::stdout();
    let mut interp = Interpreter::new(&mut stdout);
    let mut pending = String::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    pending.push('\n');
                    continue;
                }
                pending.push_str(&line);
                pending.push('\n');
                let unit = std::mem::take(&mut pending);
                let _ = editor.add_history_entry(unit.trim());
                interp.run(&unit);
            }
            Err(ReadlineError::Interrupted) => {
                pending.clear();
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
