use clap::{Parser, Subcommand};
use depot::model::{Category, MovementType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "depot")]
#[command(about = "Single-user inventory tracker with flat-file storage", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding products.csv and movements.csv
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new product
    Add {
        name: String,
        price: f64,
        /// Electronics, Clothing, Food, Furniture, Toys or Other
        category: Category,
        #[arg(default_value_t = 0)]
        quantity: u32,
    },

    /// List products
    #[command(alias = "ls")]
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,

        /// Only products below this stock threshold
        #[arg(short, long)]
        low: Option<u32>,
    },

    /// Show one product and its movement history
    Show { id: u32 },

    /// Update fields of a product
    Update {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        quantity: Option<u32>,
    },

    /// Increase stock on hand
    Inc {
        id: u32,
        amount: u32,
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Decrease stock on hand
    Dec {
        id: u32,
        amount: u32,
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Deactivate a product (kept in storage, hidden from listings)
    Deactivate { id: u32 },

    /// Permanently remove a product
    #[command(alias = "rm")]
    Remove { id: u32 },

    /// List stock movements
    #[command(alias = "hist")]
    History {
        /// Only movements for this product id
        #[arg(short, long)]
        product: Option<u32>,

        /// Only movements of this type
        #[arg(short = 't', long = "type")]
        movement_type: Option<MovementType>,

        /// Start date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<String>,
    },

    /// Search products by name
    Search { term: String },

    /// Inventory totals and extremes
    Summary,

    /// Delete all data and start over
    Reset {
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}
