use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

use noteboard::{app::App, cli::Config, logging, store::NotesStore, viewport::Viewport};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::parse();
    logging::init(&config)?;

    let store = if config.empty {
        NotesStore::new()
    } else {
        NotesStore::seeded()
    };
    let mut app = App::new(store, Viewport::new(config.cell_width));

    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = ratatui::run(|t| app.run(t));
    crossterm::execute!(std::io::stdout(), DisableMouseCapture)?;
    result?;

    tracing::info!("board closed");
    Ok(())
}
