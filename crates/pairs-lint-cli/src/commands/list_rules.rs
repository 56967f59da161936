//! List rules command implementation.

use pairs_lint_core::ViolationKind;

/// Runs the list-rules command.
pub fn run() {
    println!("Diagnostics:\n");
    println!("{:<8} {:<26} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for kind in ViolationKind::ALL {
        println!("{:<8} {:<26} {}", kind.code(), kind.name(), kind.description());
    }

    println!("\nRule specs (pair_funcs / --pair-func):");
    println!("  .log=0                     any method named `log`, pairs from arg 0");
    println!("  crate::log.Logger.log=0    `log` on crate::log::Logger only");
    println!("  crate::errors.wrap=2       function crate::errors::wrap, pairs from arg 2");
    println!("  tracing.info=1             macro tracing::info!, pairs from arg 1");

    println!("\nWhitelist specs (assume_pairs / --assume-pair):");
    println!("  crate::kv.Pairs            a Pairs value may stand in for all pairs");

    println!("\nSilence a line with:");
    println!("  // pairs-lint: allow(non-string-key) reason=\"...\"");
}
