mod app;
mod ui;

use clap::Parser;
use eframe::egui;

use folio::config::{Cli, Command, ViewConfig};
use folio::engine::SiteEngine;

use app::SiteApp;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let code = match cli.command() {
        Command::View { route } => view(ViewConfig::from_cli(&cli, &route)),
        Command::Export { out } => {
            let engine = SiteEngine::new(cli.content_client());
            match engine.export(&out) {
                Ok(summary) => {
                    println!(
                        "wrote {} pages ({} posts) to {}",
                        summary.files.len(),
                        summary.posts,
                        out.display()
                    );
                    0
                }
                Err(e) => {
                    log::error!("export failed: {}", e);
                    eprintln!("error: {}", e);
                    1
                }
            }
        }
    };
    std::process::exit(code);
}

fn view(config: ViewConfig) -> i32 {
    log::info!("opening {} (assets: {:?})", config.start, config.assets);
    if config.api_base.is_none() {
        log::warn!("CONTENT_API_URL is not set; the blog will not load");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "folio",
        options,
        Box::new(|_cc| Ok(Box::new(SiteApp::new(config)))),
    );
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::error!("window failed: {}", e);
            eprintln!("error: {}", e);
            1
        }
    }
}
