//! vykaz-sync main entrypoint.

use vykaz_sync::run;

fn main() {
    if let Err(e) = run() {
        vykaz_sync::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
