use crop_cli::registry::load_config;
use crop_core::Frame;
use crop_harris::DetectorConfig;
use std::time::Instant;

/// Flat frame with three textured patches
fn synthetic_frame(width: usize, height: usize) -> Frame {
    let mut data = vec![30u8; width * height];
    for &(cx, cy) in &[(width / 4, height / 3), (width / 2, 2 * height / 3), (3 * width / 4, height / 4)] {
        for y in cy - 6..cy + 6 {
            for x in cx - 6..cx + 6 {
                data[y * width + x] = if (x / 3 + y / 3) % 2 == 0 { 220 } else { 70 };
            }
        }
    }
    Frame::gray(width, height, data)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Detector configuration demo");
    println!("===========================\n");

    let configs = [
        DetectorConfig::new().with_metadata("Default", "Parameters of the reference pipeline"),
        DetectorConfig::fine_preset().with_metadata("Fine", "Small objects, tight boxes"),
        DetectorConfig::coarse_preset().with_metadata("Coarse", "Large objects, merged clusters"),
    ];
    for cfg in &configs {
        println!("  {}", cfg.summary());
    }

    let dir = std::env::temp_dir().join("crop-config-demo");
    std::fs::create_dir_all(&dir)?;

    println!("\nSaving:");
    for (i, cfg) in configs.iter().enumerate() {
        let json = dir.join(format!("config_{}.json", i));
        let toml = dir.join(format!("config_{}.toml", i));
        cfg.save_json(&json)?;
        cfg.save_toml(&toml)?;
        println!("  {} and {}", json.display(), toml.display());
    }

    println!("\nLoading and running on a 320x240 synthetic frame:");
    let frame = synthetic_frame(320, 240);
    for i in 0..configs.len() {
        let loaded = load_config(&dir.join(format!("config_{}.toml", i)))?;
        let cropper = loaded.build()?;
        let t0 = Instant::now();
        let detections = cropper.detect(&frame)?;
        println!(
            "  {:<8} {} proposals in {:.2?}",
            loaded.name.as_deref().unwrap_or("-"),
            detections.len(),
            t0.elapsed()
        );
        for d in &detections {
            let b = d.bounds;
            println!("           {} at ({}, {}) {}x{}", d.label, b.x, b.y, b.width, b.height);
        }
    }

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
