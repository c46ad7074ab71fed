//! Clear-cache command.

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Run the clear-cache command
///
/// Removes the cached source-media index so the next run re-walks the
/// source tree. Not an error if no cache exists.
pub fn run_clear_cache(ctx: &Context) -> Result<()> {
    ctx.cache().clear()?;
    println!("{} Source media cache cleared.", "OK".green().bold());
    Ok(())
}
