use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP chat relay
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the relay on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Relay one message to the assistant and print the reply
    Chat { message: String },

    /// Print the category label for a complaint text
    Categorize { text: String },

    /// Categorize open complaints and print the admin list
    Triage {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Move a complaint to a new status
    SetStatus {
        #[arg(short, long)]
        file: PathBuf,

        id: String,

        /// Pending, "In Progress" or Completed
        status: String,
    },

    /// File a new complaint
    Submit {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        room: Option<String>,

        #[arg(long)]
        lab: Option<String>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// List the complaints one user has filed, newest first
    List {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        user: String,
    },
}

impl Commands {
    /// Complaint file the command operates on, if any.
    pub fn complaints_file(&self) -> Option<&PathBuf> {
        match self {
            Commands::Triage { file }
            | Commands::SetStatus { file, .. }
            | Commands::Submit { file, .. }
            | Commands::List { file, .. } => Some(file),
            Commands::Serve { .. } | Commands::Chat { .. } | Commands::Categorize { .. } => None,
        }
    }
}
