use lic_smooth::config::smooth::load_config;
use lic_smooth::image::io::{load_image, save_image, write_json_file};
use lic_smooth::smoother::AnisotropicSmoother;
use log::info;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config_path = Path::new(&config_path);
    let config = load_config(config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));

    let input = load_image(&base.join(&config.input))?;
    let mode = config.mode.load(base)?;
    info!(
        "Loaded {}x{}x{} from {}",
        input.w,
        input.h,
        input.channels,
        config.input.display()
    );

    let mut smoother = AnisotropicSmoother::new(config.params.clone());
    let mut last_decile = 0;
    smoother.set_progress(Box::new(move |fraction| {
        let decile = (fraction * 10.0) as u32;
        if decile > last_decile {
            last_decile = decile;
            info!("progress {:>3.0}%", fraction * 100.0);
        }
    }));
    smoother.prepare(mode, input).map_err(|e| e.to_string())?;
    smoother.run().map_err(|e| e.to_string())?;
    let output = smoother.finish().map_err(|e| e.to_string())?;
    let report = smoother.report();
    info!(
        "{} passes, {} fallback pixels, {} degenerate tensors",
        report.iterations.len(),
        report.fallback_pixels(),
        report.degenerate_tensors()
    );

    let image_path = base.join(&config.output.image);
    save_image(&output, &image_path)?;
    println!(
        "Saved {}x{} {} result to {} in {:.1} ms",
        output.w,
        output.h,
        report.mode,
        image_path.display(),
        report.timing.total_ms
    );
    if let Some(report_path) = &config.output.report_json {
        let report_path = base.join(report_path);
        write_json_file(&report_path, report)?;
        println!("Saved run report to {}", report_path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: lic_smooth <config.json>".to_string()
}
