//! comment-thread - nested comments with moderation
//!
//! Reads and moderates the comment thread of a post on a content service.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a config file and point it at the service
//! comment-thread config init
//!
//! # Read the thread of post 12
//! comment-thread list 12
//!
//! # Reply to comment 42 as user 7
//! comment-thread --as-user 7 comment 12 "Agreed" --reply-to 42
//!
//! # Moderate as an admin
//! comment-thread --as-user 1 --role admin approve 12 43
//! ```

mod commands;

#[tokio::main]
async fn main() {
    if let Err(err) = commands::run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
