//! The `skillgauge roles` command.

use anyhow::Result;

use skillgauge_providers::builtin_roles;

pub fn execute() -> Result<()> {
    println!("Built-in question bank roles:");
    for (role, count) in builtin_roles() {
        println!("  {role} ({count} questions)");
    }
    println!("\nOther role titles match by keyword; unknown roles get a general set.");
    Ok(())
}
