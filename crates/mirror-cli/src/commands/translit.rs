//! `translit`: print the romanization of each argument.

use colored::Colorize;
use mirror_translit::transliterate;

pub fn run_translit(texts: &[String]) {
    for text in texts {
        println!("{} {} {}", text, "->".dimmed(), transliterate(text));
    }
}
