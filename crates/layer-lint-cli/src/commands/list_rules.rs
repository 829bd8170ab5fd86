//! List-rules command implementation.

use layer_lint_core::BoundaryRule;
use layer_lint_rules::default_rules;

/// Prints the governance registry in evaluation order.
pub fn run() {
    let rules = default_rules();
    println!("Registry ({} rules, evaluated in order):\n", rules.len());
    for rule in &rules {
        println!("  {:<12} {}", rule.kind(), rule.name());
    }
}
