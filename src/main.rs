use android_ui_tap::args::{Args, Mode};
use android_ui_tap::device::{AdbShell, ScreenSource};
use android_ui_tap::pipeline::{TapOutcome, TapPipeline};
use android_ui_tap::template_matching::{MatchConfig, MatchResult, Template, TemplateMatcher};

// Exit codes: 0 success, 1 failure, 2 element not on screen.
// "Not on screen" is an expected outcome, scripts polling for an element
// key off code 2 instead of parsing output.
fn main() {
    env_logger::init();
    let Some(args) = Args::parse() else {
        return;
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    let code = rt.block_on(run(args));
    std::process::exit(code);
}

async fn run(args: Args) -> i32 {
    let shell = match AdbShell::connect(args.device.as_deref()).await {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("❌ {e}");
            return 1;
        }
    };
    let (width, height) = shell.screen_dimensions();
    println!("📱 Device: {} size: {}x{}", shell.serial(), width, height);

    let config = match args.threshold {
        Some(t) => MatchConfig::with_threshold(t),
        None => MatchConfig::default(),
    };

    match args.mode {
        Mode::Screenshot { output } => {
            println!("📸 Capturing screenshot...");
            match shell.capture_png_bytes().await {
                Ok(bytes) => {
                    if let Err(e) = tokio::fs::write(&output, &bytes).await {
                        eprintln!("❌ Write failed: {e}");
                        return 1;
                    }
                    println!("✅ Screenshot saved to {output}");
                    0
                }
                Err(e) => {
                    eprintln!("❌ Screenshot failed: {e}");
                    1
                }
            }
        }
        Mode::Find { template } => {
            let template = match Template::from_file(&template) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return 1;
                }
            };
            let screen = match shell.capture().await {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("❌ Capture failed: {e}");
                    return 1;
                }
            };
            let matcher = TemplateMatcher::new(config);
            match matcher.find_match(&screen, &template) {
                Ok(MatchResult::Found { anchor, score }) => {
                    let center = template.center_at(anchor);
                    println!(
                        "✅ '{}' at ({},{}) score {:.3}, center ({},{})",
                        template.name(),
                        anchor.x,
                        anchor.y,
                        score,
                        center.x,
                        center.y
                    );
                    0
                }
                Ok(MatchResult::NotFound) => {
                    println!("🔍 '{}' not on screen", template.name());
                    2
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    1
                }
            }
        }
        Mode::Tap { template } => {
            let template = match Template::from_file(&template) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return 1;
                }
            };
            let pipeline = TapPipeline::new(&shell, &shell, config);
            match pipeline.run(&template).await {
                Ok(TapOutcome::Tapped { point, score }) => {
                    println!("👆 Tapped ({},{}) score {:.3}", point.x, point.y, score);
                    0
                }
                Ok(TapOutcome::ElementAbsent) => {
                    println!("🔍 '{}' not on screen, no tap sent", template.name());
                    2
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    1
                }
            }
        }
    }
}
