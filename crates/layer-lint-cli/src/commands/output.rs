//! Shared output formatting for verdicts.

use anyhow::Result;
use layer_lint_core::Verdict;

/// Prints the verdict in the selected presentation mode.
pub fn print(verdict: &Verdict, json: bool) -> Result<()> {
    if json {
        println!("{}", verdict.to_json()?);
    } else {
        print!("{}", verdict.render_text());
    }
    Ok(())
}
