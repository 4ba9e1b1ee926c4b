//! Poll a growing file and print lines as they are appended

use std::{thread, time::Duration};

use line_file::{LineFile, Options};

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "<some log file>".to_string());

    let file = LineFile::open_with(&path, Options::new().strip_carriage_return(true))
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });

    let mut shown = file.line_count();

    loop {
        thread::sleep(Duration::from_millis(500));

        match file.reload_if_changed() {
            Ok(false) => continue,
            Ok(true) => (),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }

        let total = file.line_count();
        if total < shown {
            // Truncated or rotated, start over
            shown = 0;
        }

        for line in file.read_lines(shown, total - shown).unwrap() {
            println!("{}", line);
        }
        shown = total;
    }
}
