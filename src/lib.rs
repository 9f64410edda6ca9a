//! A small expression language: lexer, Pratt parser, AST and a tree-walking
//! evaluator with lexical closures.

pub mod ast;
pub mod env;
pub mod eval;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;
mod parser_tracing;

pub use env::{Env, Environment};
pub use eval::eval;
pub use lexer::{Lexer, TokenSource, TokenStream};
pub use object::Object;
pub use parser::{parse, ParseError, Parser};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
/// Use `RUST_LOG=treewalk=debug` for diagnostics, `treewalk=trace` for parser
/// rule entry/exit and function calls.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
