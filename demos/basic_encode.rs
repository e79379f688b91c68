//! Basic example of encoding a short print job into an FCode container

use fcode_core::{FcodeBuilder, Move};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== FCode Basic Encoding Example ===\n");

    let mut session = FcodeBuilder::new("EXTRUDER")
        .metadata("AUTHOR", "basic_encode")
        .metadata("OBJECT", "square")
        .build_memory()?;

    // Heat up, home, then trace a 20 mm square at 0.2 mm
    session.set_toolhead_heater_temperature(200.0, true);
    session.home();
    session.move_to(&Move::new().feedrate(3000.0).x(0.0).y(0.0).z(0.2));

    let corners = [(20.0, 0.0), (20.0, 20.0), (0.0, 20.0), (0.0, 0.0)];
    for (i, (x, y)) in corners.iter().enumerate() {
        let e = (i + 1) as f32 * 0.8;
        session.move_to(&Move::new().feedrate(1200.0).x(*x).y(*y).extruder(0, e));
    }

    session.set_toolhead_fan_speed(0.0);
    session.enable_motor();

    let stats = *session.statistics();
    let diagnostics = session.diagnostics().to_vec();
    let container = session.into_bytes()?;

    println!("Container size:   {} bytes", container.len());
    println!("Travel distance:  {:.2} mm", stats.distance_traveled);
    println!("Estimated time:   {:.2} s", stats.time_cost);
    println!("Filament used:    {:.2} mm", stats.filament_used[0]);

    println!("\nDiagnostics:");
    for d in &diagnostics {
        println!("  {}", d);
    }

    println!("\nFirst 32 bytes:");
    for chunk in container[..32.min(container.len())].chunks(16) {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  {}", hex.join(" "));
    }

    Ok(())
}
