use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cropmark")]
#[command(about = "Tag and rename detector crops with their QR payload", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one image or every image in a folder
    Analyze {
        /// Image file or folder
        #[arg(required = true)]
        path: PathBuf,

        /// Ask the detector for debug artifacts
        #[arg(long)]
        debug: bool,

        /// Let the detector keep intermediate crops
        #[arg(long)]
        save_crops: bool,

        /// Write the result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the images in a folder
    List {
        #[arg(required = true)]
        folder: PathBuf,
    },

    /// Show the metadata embedded in a crop
    Inspect {
        #[arg(required = true)]
        image: PathBuf,
    },

    /// Show or edit the configuration
    Config {
        /// Python interpreter used to run the detector
        #[arg(long)]
        set_python: Option<String>,

        /// Detector script
        #[arg(long)]
        set_script: Option<PathBuf>,

        /// Detector timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Print the configuration
        #[arg(long)]
        show: bool,
    },
}
