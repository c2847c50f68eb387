#[cfg(windows)]
fn main() -> Result<(), eframe::Error> {
    use autoclicker_rust::app::AutoClickerApp;
    use eframe::egui;

    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 230.0])
            .with_title("Auto Clicker - Rust Edition"),
        ..Default::default()
    };

    eframe::run_native(
        "Auto Clicker",
        options,
        Box::new(|_cc| Box::new(AutoClickerApp::default())),
    )
}

#[cfg(not(windows))]
fn main() {
    eprintln!("autoclicker-rust drives a Windows game window; only the library builds on this platform.");
}
