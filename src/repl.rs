use std::io::{self, BufRead, Write};
use crate::env::Environment;
use crate::eval::eval;
use crate::lexer::Lexer;
use crate::parser::{self, ParseError};

const PROMPT: &str = ">> ";

/// Reads lines from `input` until end of input or `exit`/`quit`, evaluating
/// each one in a session-wide environment and echoing the result.
pub fn start<R: BufRead, W: Write>(mut input: R, output: &mut W) -> io::Result<()> {
    let env = Environment::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let trimmed_line = line.trim();
        if trimmed_line == "exit" || trimmed_line == "quit" {
            writeln!(output, "Exiting...")?;
            return Ok(());
        }

        let (program, errors) = parser::parse(Lexer::new(&line));
        if !errors.is_empty() {
            print_parse_errors(output, &errors)?;
            continue;
        }

        let evaluated = eval(&program, &env);
        writeln!(output, "{}", evaluated.inspect())?;
    }
}

fn print_parse_errors<W: Write>(output: &mut W, errors: &[ParseError]) -> io::Result<()> {
    for error in errors {
        writeln!(output, "\t{}", error)?;
    }
    Ok(())
}
