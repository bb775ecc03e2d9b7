//! Operator-facing progress output

use colored::Colorize;
use griefbot::{Profile, RunObserver, SessionOutcome};

/// Prints run progress to stdout
pub struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn batch_started(&self, description: &str) {
        println!("{}", description.bold());
    }

    fn session_started(&self, label: &str, profile: Option<&Profile>) {
        println!("\n{}", format!("=== {} ===", label).cyan().bold());
        if let Some(profile) = profile {
            print_profile(profile);
        }
    }

    fn progress(&self, message: &str) {
        println!("  {}", message.dimmed());
    }

    fn session_finished(&self, outcome: &SessionOutcome) {
        match &outcome.error {
            None => println!("{} Session completed successfully!", "✓".green()),
            Some(error) => println!("{} Error in session: {}", "✗".red(), error),
        }
    }
}

pub fn print_profile(profile: &Profile) {
    println!("{}", "Profile Details:".bold());
    for line in profile.summary_lines() {
        println!("  {}", line);
    }
}
