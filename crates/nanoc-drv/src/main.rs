use nanoc_drv::{Config, Outcome, Session};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match Session::new(config).run() {
        Ok(Outcome::Lexed(rendered)) => print!("{rendered}"),
        Ok(Outcome::Parsed(rendered)) => print!("{rendered}"),
        Ok(Outcome::Compiled) => {}
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
