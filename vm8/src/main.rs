use std::path::PathBuf;

mod audio;
mod keymap;
mod run;

fn main() {
    env_logger::init();

    let rom = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: vm8 <path to program image>");
            std::process::exit(2);
        }
    };

    if let Err(message) = run::run(&rom) {
        eprintln!("vm8: {message}");
        std::process::exit(1);
    }
}
