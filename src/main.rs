use flickr_explorer::config::Settings;
use flickr_explorer::{app, logging};
use tracing::error;

fn main() -> iced::Result {
    logging::init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    app::run(settings)
}
