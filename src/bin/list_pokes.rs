//! Prints a sample of stored records.
//!
//! Takes no arguments. Settings come from `./pokedex.json` when present.

use pokedex::cli::{self, Utility};

fn main() {
    if cli::run_utility(Utility::List).is_err() {
        std::process::exit(1);
    }
}
