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
use runner::RunOptions;
use server::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use store::{Store, DEFAULT_ZONES};

/// The options we can pass to the API server
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ServeOptions {
    /// The address to listen on
    #[clap(short = 'a', long, default_value = "0.0.0.0:8000")]
    pub addr: String,

    /// The SQLite database file
    #[clap(short = 'b', long, default_value = "eplusdata.sqlite")]
    pub database: String,

    /// Where result CSVs are archived, one per run
    #[clap(long, default_value = "res")]
    pub results_dir: String,

    /// The EnergyPlus executable
    #[clap(long, default_value = "energyplus")]
    pub energyplus: String,

    /// An explicit Energy+.idd dictionary, when the executable's
    /// bundled one should not be used
    #[clap(long)]
    pub idd: Option<String>,

    /// The web front end's origin, for CORS
    #[clap(long, default_value = "http://localhost:3000")]
    pub front_origin: String,
}

/// Opens the database, seeds the zone catalogue and serves the API
/// until the process is stopped.
pub async fn serve(options: ServeOptions) -> Result<(), String> {
    let addr: SocketAddr = options
        .addr
        .parse()
        .map_err(|_| format!("Invalid listen address '{}'", options.addr))?;

    let store = Store::open(&options.database)?;
    let added = store.seed_zones(&DEFAULT_ZONES.map(String::from))?;
    if added > 0 {
        tracing::info!(added, "seeded the zone catalogue");
    }

    let state = AppState::new(
        store,
        RunOptions {
            energyplus_exe: options.energyplus.clone(),
            idd_file: options.idd.clone(),
            results_dir: PathBuf::from(&options.results_dir),
        },
    );

    server::serve(addr, state, &options.front_origin).await
}
