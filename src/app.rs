use crate::core::rasterizer::FrameStats;
use crate::error::Result;
use crate::io::config::Config;
use crate::io::image::timestamped_dump_path;
use crate::pipeline::renderer::Renderer;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Frames between timing reports.
const REPORT_INTERVAL: usize = 30;

/// Runs the headless frame loop and dumps the last frame.
///
/// Each frame advances the simulation by `render.frame_time` seconds using the
/// configured navigation input. Returns the path of the written image.
pub fn run(config: &Config) -> Result<PathBuf> {
    let mut renderer = Renderer::from_config(config)?;
    let frames = config.render.frames.max(1);
    let navigation = config.camera.navigation;

    info!(
        "Rendering {} frame(s) at {}x{} ({} rasterization, shading mode: {})",
        frames,
        config.render.width,
        config.render.height,
        if renderer.rasterizer.parallel { "parallel" } else { "sequential" },
        renderer.state().shading_mode()
    );

    let start_time = Instant::now();
    let mut interval_start = Instant::now();
    let mut last_report = 0;
    let mut total = FrameStats::default();

    for frame in 1..=frames {
        renderer.update(config.render.frame_time, &navigation);
        total.merge(&renderer.render());

        if frame % REPORT_INTERVAL == 0 || frame == frames {
            let rendered = frame - last_report;
            let elapsed = interval_start.elapsed().as_secs_f64();
            info!(
                "Frame {}/{}: {:.2} ms/frame",
                frame,
                frames,
                elapsed * 1000.0 / rendered as f64
            );
            interval_start = Instant::now();
            last_report = frame;
        }
    }

    info!(
        "Rendered {} frame(s) in {:.2?}: {} triangles drawn, {} dropped by depth range, {} degenerate, {} pixels shaded",
        frames,
        start_time.elapsed(),
        total.triangles_rasterized,
        total.triangles_depth_rejected,
        total.triangles_degenerate,
        total.pixels_shaded
    );

    let output = if config.render.output.is_empty() {
        timestamped_dump_path()
    } else {
        PathBuf::from(&config.render.output)
    };
    renderer.save_buffer_to_image(Some(&output))
}
