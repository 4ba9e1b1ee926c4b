//! Attach to a text file and print a window of its lines

use line_file::LineFile;

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "<some log file>".to_string());

    // Count the lines once
    let file = match LineFile::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("{} has {} lines", path, file.line_count());

    // Read the last 10 lines
    let start = file.line_count().saturating_sub(10);
    for (i, line) in file.read_lines(start, 10).unwrap().iter().enumerate() {
        println!("{:>6} {}", start + i, line);
    }
}
