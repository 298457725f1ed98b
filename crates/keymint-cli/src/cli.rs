use std::path::PathBuf;

use clap::Parser;
use keymint::core::DEFAULT_DAYS;
use keymint::{IssueRequest, SaveMode};

#[derive(Parser, Debug)]
#[command(
    name = "keymint",
    version,
    about = "Issue an access token and print its id",
    long_about = None
)]
pub struct Cli {
    /// Days until the token expires, -1 for never
    #[arg(short, long, default_value_t = DEFAULT_DAYS, allow_negative_numbers = true)]
    pub days: i64,

    /// Comma-separated permission level names or bit positions
    #[arg(short, long)]
    pub perms: Option<String>,

    /// Raw permission bitmask, OR-ed in verbatim
    #[arg(short, long = "raw-perms", allow_negative_numbers = true)]
    pub raw_perms: Option<i64>,

    /// Print the token as a JSON object
    #[arg(short, long)]
    pub json: bool,

    /// SQLite database holding issued tokens
    #[arg(long, env = "KEYMINT_DB", default_value = "keymint.db")]
    pub db: PathBuf,

    /// JSON file mapping permission level names to bit positions
    #[arg(long, env = "KEYMINT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Save the token once with its full permission mask
    #[arg(long)]
    pub single_save: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn request(&self) -> IssueRequest {
        let mut request = IssueRequest::new(self.days);
        if let Some(raw) = self.raw_perms {
            request = request.raw_permissions(raw);
        }
        if let Some(list) = &self.perms {
            request = request.permission_list(list);
        }
        request
    }

    pub fn save_mode(&self) -> SaveMode {
        if self.single_save {
            SaveMode::Single
        } else {
            SaveMode::TwoPhase
        }
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
