use std::env;
use std::io::{self, stdout};
use std::process;

fn main() {
    treewalk::init_tracing();

    match env::var("USER") {
        Ok(user) => println!("Hello {}! This is the treewalk programming language!", user),
        Err(_) => println!("Hello! This is the treewalk programming language!"),
    }
    println!("Feel free to type in commands");

    if let Err(err) = treewalk::repl::start(io::stdin().lock(), &mut stdout().lock()) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
