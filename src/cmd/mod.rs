//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module     | Commands handled |
//! |------------|------------------|
//! | `brands`   | `Brands`         |
//! | `profile`  | `Profile`        |
//! | `posts`    | `Posts`          |
//! | `audit`    | `Audit`          |
//! | `config`   | `Config`         |

pub mod audit;
pub mod brands;
pub mod config;
pub mod posts;
pub mod profile;

pub use audit::cmd_audit;
pub use brands::cmd_brands;
pub use config::cmd_config;
pub use posts::cmd_posts;
pub use profile::cmd_profile;

use brand_console::errors::{BrandError, EditorError, GatewayError, TransitionError};

/// True when the command failed because the backend rejected the session.
pub fn is_auth_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(gateway) = cause.downcast_ref::<GatewayError>() {
            return gateway.is_auth();
        }
        match (
            cause.downcast_ref::<EditorError>(),
            cause.downcast_ref::<TransitionError>(),
            cause.downcast_ref::<BrandError>(),
        ) {
            (Some(EditorError::Gateway(gateway)), _, _)
            | (_, Some(TransitionError::Gateway(gateway)), _)
            | (_, _, Some(BrandError::Gateway(gateway))) => gateway.is_auth(),
            _ => false,
        }
    })
}

/// Print an operator-facing error line without aborting.
pub fn print_failure(message: &str) {
    println!("  {} {}", console::style("Error:").red().bold(), message);
}
