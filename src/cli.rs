use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stackyard - container yard slot tracking
#[derive(Parser)]
#[command(name = "stackyard")]
#[command(about = "Track yard slots, place containers, and detect rearrangements")]
#[command(version)]
pub struct Cli {
    /// Path to the yard configuration file.
    ///
    /// Created by `stackyard init`. All other commands load it to learn the
    /// grid topology and the state directory.
    #[arg(long, global = true, default_value = "stackyard.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Register new containers on the inbound queue
    Ingest {
        /// JSON file holding an array of intake records
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Owning company for a single inline record
        #[arg(long, default_value = "")]
        company: String,

        /// Owner contact name for a single inline record
        #[arg(long, default_value = "")]
        owner: String,

        /// Container size: small, standard, large
        #[arg(long, default_value = "standard")]
        size: String,

        /// Cargo kind: general, refrigerated, liquid, hazardous
        #[arg(long, default_value = "general")]
        kind: String,

        /// Handling priority: low, normal, high
        #[arg(long, default_value = "normal")]
        priority: String,
    },
    /// Auto-place queued containers into first-fit slots
    Place {
        /// Maximum number of containers to place
        #[arg(default_value_t = 1)]
        count: usize,
    },
    /// Move a container to a specific slot
    Move {
        /// Container id (e.g. CNT-7F3K9Q)
        container: String,
        /// Target slot id (e.g. A-R01-C01)
        slot: String,
    },
    /// Shift a container within a slot's stack
    Reorder {
        /// Slot id
        slot: String,
        /// Current position, bottom = 0
        from: usize,
        /// New position
        to: usize,
    },
    /// Pull a container out of a slot, back to the inbound queue
    Evict {
        /// Slot id
        slot: String,
        /// Container id
        container: String,
    },
    /// List slots whose arrangement changed since the last acknowledge
    Changed,
    /// Acknowledge the current layout as the new baseline
    Ack,
    /// Show yard occupancy and aggregate counts
    Status,
    /// Show every slot's stack, bottom to top
    Slots,
    /// Find containers by id, company, or owner name (exact, case-insensitive)
    Find {
        /// Query string
        query: String,
    },
}
