//! Validates the first record of the data file and inserts it.
//!
//! Takes no arguments. Settings come from `./pokedex.json` when present.

use pokedex::cli::{self, Utility};

fn main() {
    if cli::run_utility(Utility::Load).is_err() {
        std::process::exit(1);
    }
}
