use eframe::egui;
use imglab::app::WarpApp;
use imglab::{cli, logger};

fn main() -> Result<(), eframe::Error> {
    // -- CLI / headless mode ---------------------------------------------
    if cli::is_cli_mode() {
        use clap::Parser;
        let args = cli::WarpArgs::parse();
        logger::echo_to_stderr(args.out.verbose);
        logger::init("warplab");
        let code = cli::run_warp(args);
        std::process::exit(if code == std::process::ExitCode::SUCCESS {
            0
        } else {
            1
        });
    }

    // -- GUI mode -----------------------------------------------------
    logger::init("warplab");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 680.0])
            .with_title("Image Transformations"),
        ..Default::default()
    };

    eframe::run_native(
        "warplab",
        options,
        Box::new(|cc| Box::new(WarpApp::new(cc))),
    )
}
