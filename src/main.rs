use constellation::{App, VisualConfig};

fn main() {
    if let Err(e) = App::new(VisualConfig::default()).run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
