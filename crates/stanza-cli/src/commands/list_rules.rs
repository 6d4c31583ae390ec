//! List rules command implementation.

use stanza_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<36} {:<6} Description", "Code", "Name", "Fix");
    println!("{}", "-".repeat(96));

    for rule in all_rules() {
        println!(
            "{:<8} {:<36} {:<6} {}",
            rule.code(),
            rule.name(),
            if rule.is_fixable() { "yes" } else { "" },
            rule.description()
        );
    }

    println!("\nPresets:");
    println!(
        "  recommended  - {} (default)",
        Preset::Recommended.rule_names().join(", ")
    );
    println!("  all          - {}", Preset::All.rule_names().join(", "));

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  stanza check --rules statement-grouping,dot-notation");
    println!("  stanza check --rules ST001,ST004");
}
