pub mod pack;
pub mod stats;

use colored::*;
use fcode_core::Statistics;

/// Print statistics and diagnostics in the common report layout
pub(crate) fn print_report(stats: &Statistics, diagnostics: &[String]) {
    println!("\n=== Statistics ===");
    println!("Travel distance:    {:.2} mm", stats.distance_traveled);
    println!("Estimated time:     {:.2} s", stats.time_cost);
    println!(
        "Extents (x/y/z/r):  {:.2} / {:.2} / {:.2} / {:.2} mm",
        stats.max_x, stats.max_y, stats.max_z, stats.max_radius
    );
    println!(
        "Filament used:      {:.2} / {:.2} / {:.2} mm",
        stats.filament_used[0], stats.filament_used[1], stats.filament_used[2]
    );

    println!("\n=== Diagnostics ===");
    if diagnostics.is_empty() {
        println!("{} No diagnostics", "✓".green());
        return;
    }
    for d in diagnostics {
        if d.starts_with("ERROR") {
            println!("{} {}", "✗".red(), d);
        } else {
            println!("{} {}", "!".yellow(), d);
        }
    }
}
