//! Builds the word table ahead of time and emits it as code.

use chd::codegen::CodeGenerator;
use std::path::PathBuf;

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=src/words.rs");

    let words: Vec<String> = (0..chd_test_words::COUNT)
        .map(chd_test_words::word)
        .collect();
    let phf = chd::Phf::try_from_keys(&words, &chd::Settings::new())
        .expect("Failed to build the word table");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let code = CodeGenerator::new().generate(&phf);
    std::fs::write(out_dir.join("words.rs"), code.to_string()).unwrap();
}

#[path = "src/words.rs"]
mod chd_test_words;
