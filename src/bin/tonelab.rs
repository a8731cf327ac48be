use eframe::egui;
use imglab::app::ToneApp;
use imglab::{cli, logger};

fn main() -> Result<(), eframe::Error> {
    // -- CLI / headless mode ---------------------------------------------
    if cli::is_cli_mode() {
        use clap::Parser;
        let args = cli::ToneArgs::parse();
        logger::echo_to_stderr(args.out.verbose);
        logger::init("tonelab");
        let code = cli::run_tone(args);
        std::process::exit(if code == std::process::ExitCode::SUCCESS {
            0
        } else {
            1
        });
    }

    // -- GUI mode -----------------------------------------------------
    logger::init("tonelab");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([820.0, 480.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Image Processing"),
        ..Default::default()
    };

    eframe::run_native(
        "tonelab",
        options,
        Box::new(|cc| Box::new(ToneApp::new(cc))),
    )
}
