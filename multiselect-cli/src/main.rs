mod command;
mod config;
mod error;
mod paths;
mod presenter;

use std::fs::{self, File};
use std::path::PathBuf;

use multiselect_lib::error::AddNewError;
use multiselect_lib::source::OriginResolver;
use multiselect_lib::{Key, SelectOption, SelectorWidget, WidgetEvent};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use command::{Command, HELP};
use config::DemoConfig;
use error::DemoError;
use presenter::TerminalPresenter;

fn init_logging() -> Result<PathBuf, DemoError> {
    let path = paths::log_file();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::create(&path)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .map_err(|e| DemoError::Logging(e.to_string()))?;
    Ok(path)
}

fn build_widget(config: DemoConfig) -> Result<SelectorWidget, DemoError> {
    let resolver = OriginResolver::new(config.origin())?;
    let mut builder = SelectorWidget::builder(config.selector)
        .add_new_fn(|label: String| async move {
            let id = Uuid::new_v4().to_string();
            log::info!("Minted {} for {:?}", id, label);
            Ok::<_, AddNewError>(Some(SelectOption::new(id, label)))
        })
        .on_change(|selected| {
            let labels: Vec<&str> = selected.iter().map(|o| o.label.as_str()).collect();
            log::info!("Selection changed: {:?}", labels);
        })
        .on_search(|text| log::debug!("Search text: {:?}", text));

    builder = match config.endpoint {
        Some(endpoint) => builder.endpoint(endpoint).base_url_resolver(resolver),
        None => builder.static_options(config.options),
    };

    Ok(builder.build())
}

async fn apply(widget: &SelectorWidget, command: Command) {
    let event = match command {
        Command::Type(text) => WidgetEvent::TextChanged(text),
        Command::Pick(n) => match widget.view().options.get(n.wrapping_sub(1)) {
            Some(option) => WidgetEvent::Picked(option.clone()),
            None => {
                println!("no suggestion #{}", n);
                return;
            }
        },
        Command::New(label) => {
            let outcome = widget.add_new(&label).await;
            println!("{:?}", outcome);
            return;
        }
        Command::Enter => WidgetEvent::KeyPressed(Key::Enter),
        Command::Add => WidgetEvent::AddClicked,
        Command::Remove(n) => match widget.selected().get(n.wrapping_sub(1)) {
            Some(option) => WidgetEvent::Remove(option.id.clone()),
            None => {
                println!("no selected option #{}", n);
                return;
            }
        },
        Command::Backspace => WidgetEvent::KeyPressed(Key::Backspace),
        Command::Escape => WidgetEvent::KeyPressed(Key::Escape),
        Command::Clear => WidgetEvent::Clear,
        Command::Focus => WidgetEvent::Focus,
        Command::Blur => WidgetEvent::Blur,
        Command::Show | Command::Help | Command::Quit => return,
    };

    // Async work (creation, fetch) re-renders through `changed()`
    let _ = widget.dispatch(event);
}

async fn run(config: DemoConfig) -> Result<(), DemoError> {
    let widget = build_widget(config)?;
    let mut terminal = TerminalPresenter::new(std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    widget.mount();
    widget.focus();
    println!("{}", HELP);

    loop {
        widget.render_to(&mut terminal);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    None => {}
                    Some(Err(e)) => println!("{}", e),
                    Some(Ok(Command::Quit)) => break,
                    Some(Ok(Command::Help)) => println!("{}", HELP),
                    Some(Ok(Command::Show)) => {
                        widget.clear_dirty();
                        print!("{}", presenter::render_text(&widget.view()));
                    }
                    Some(Ok(command)) => apply(&widget, command).await,
                }
            }
            _ = widget.changed() => {}
        }
    }

    widget.unmount();
    Ok(())
}

#[tokio::main]
async fn main() {
    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Warning: {}", e);
            None
        }
    };

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DemoConfig::load(&path),
        None => Ok(DemoConfig::sample()),
    };

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    if let Some(path) = log_path {
        log::info!("Log written to {}", path.display());
    }
}
