//! Print the type and structure of the classifier artifact.
//!
//! Usage: `inspect_model [PATH]`, defaulting to the served classifier file.

use std::path::PathBuf;

use heartrisk::artifacts::repo_fs::{default_root, read_classifier, MODEL_FILE};

fn main() {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| default_root().join(MODEL_FILE));

    match read_classifier(&path) {
        Ok(model) => print!("{}", model.describe()),
        Err(err) => println!("Error loading model: {err}"),
    }
}
