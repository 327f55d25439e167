/*
MIT License
Copyright (c)  Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use clap::Parser;
use store::{Store, DEFAULT_ZONES};

/// Fills the zone catalogue of an `eplusdata` database. Zones that are
/// already there are left untouched.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct SeedOptions {
    /// The SQLite database file
    #[clap(short = 'b', long, default_value = "eplusdata.sqlite")]
    database: String,

    /// The zone names to register (defaults to the standard catalogue)
    zones: Vec<String>,
}

fn run(options: SeedOptions) -> Result<(), String> {
    let zones = if options.zones.is_empty() {
        DEFAULT_ZONES.map(String::from).to_vec()
    } else {
        options.zones
    };

    let store = Store::open(&options.database)?;
    let added = store.seed_zones(&zones)?;
    println!("Registered {} new zone(s) in '{}'", added, options.database);
    Ok(())
}

fn main() {
    let options = SeedOptions::parse();
    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
