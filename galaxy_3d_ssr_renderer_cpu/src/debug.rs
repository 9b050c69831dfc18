/// Device statistics report with colored console output

use colored::*;
use galaxy_3d_ssr::galaxy3d::render::DeviceStats;

/// Report lines without colors
pub fn format_stats_report(stats: &DeviceStats) -> Vec<String> {
    vec![
        format!("Textures created: {}", stats.textures_created),
        format!("Submissions: {}", stats.submissions),
        format!("Blits: {}", stats.blits),
        format!("Draws: {}", stats.draws),
    ]
}

/// Print device statistics report
pub fn print_stats_report(stats: &DeviceStats) {
    if stats.submissions == 0 {
        println!("\n{}", "✓ No command list submitted".green().bold());
        return;
    }

    println!("\n{}", "=== Software Device Report ===".bright_blue().bold());
    for line in format_stats_report(stats) {
        match line.split_once(':') {
            Some((label, value)) => println!("  {}{}", format!("{}:", label).cyan(), value),
            None => println!("  {}", line),
        }
    }
    println!("{}\n", "==============================".bright_blue().bold());
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
