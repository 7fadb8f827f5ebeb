//! Check camera capabilities.

use photobooth_capture_engine::webcam::{check_capabilities, Capability};
use photobooth_common::config::AppConfig;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Photobooth System Check");
    println!("{}", "=".repeat(50));

    let mut capabilities = check_capabilities().await;
    capabilities.push(check_store(config));
    print_capability_report(&capabilities);

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);

    println!();
    if all_required_ok {
        println!("All required capabilities are available. Ready to shoot.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
        println!("Sessions can still run with --source <image> or --synthetic.");
    }
    Ok(())
}

fn check_store(config: &AppConfig) -> Capability {
    let dir = &config.store_dir;
    let writable = std::fs::create_dir_all(dir).is_ok()
        && std::fs::metadata(dir)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false);
    Capability {
        name: "Session Store".to_string(),
        description: dir.display().to_string(),
        available: writable,
        required: false,
        fix_instructions: (!writable)
            .then(|| "Set store_dir in the config or pass --store <DIR>".to_string()),
    }
}

fn print_capability_report(capabilities: &[Capability]) {
    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };
        println!("  {} {}: {}", status, cap.name, cap.description);
        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
