use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use part_viewer::api::ApiClient;
use part_viewer::cli::Cli;
use part_viewer::directory::{load_directory, SelectableElement};
use part_viewer::loaders::GltfLoader;
use part_viewer::poller::JobPoller;
use part_viewer::render::HeadlessRenderer;
use part_viewer::selection::{Selection, SelectionController, SelectionPhase};
use part_viewer::ui::{WindowLayout, PLACEHOLDER_LABEL};
use part_viewer::viewer::ViewerState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Single cooperative execution context: every callback, timer and poll
    // interleaves on this one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let client = ApiClient::new(&cli.base_url);

    println!("Loading element directory from {}...", cli.base_url);
    let choices = load_directory(&client, &cli.document_id, &cli.workspace_id)
        .await
        .context("failed to load the element directory")?;
    if choices.is_empty() {
        println!("No translatable elements in this workspace.");
        return Ok(());
    }

    let window = WindowLayout {
        width: cli.window_width,
        height: cli.window_height,
        selector_height: cli.selector_height,
    };
    let view = ViewerState::new(
        Box::new(GltfLoader::new()),
        Box::new(HeadlessRenderer::new()),
        window,
    );
    let controller =
        SelectionController::new(client, view, JobPoller::from_secs(cli.poll_interval));

    print_choices(&choices);
    println!("Commands: <number> select, e export, l list, q quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_status(&controller);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => {}
            "q" => break,
            "l" => print_choices(&choices),
            "e" => match controller.export() {
                Ok(export) => {
                    let bytes = BASE64
                        .decode(export.data.as_bytes())
                        .context("export payload was not valid base64")?;
                    std::fs::write(&export.filename, bytes)
                        .with_context(|| format!("failed to write {}", export.filename))?;
                    println!("Wrote {}", export.filename);
                }
                Err(e) => println!("Export refused: {}", e),
            },
            input => match input.parse::<usize>() {
                Ok(0) => controller.select(&Selection::Placeholder),
                Ok(n) if n <= choices.len() => {
                    controller.select(&Selection::Element(choices[n - 1].clone()));
                    println!("Selected {}", choices[n - 1].label);
                }
                _ => println!("Unrecognized command: {}", input),
            },
        }
    }

    Ok(())
}

fn print_choices(choices: &[SelectableElement]) {
    println!("  0: {}", PLACEHOLDER_LABEL);
    for (i, choice) in choices.iter().enumerate() {
        println!("  {}: {}", i + 1, choice.label);
    }
}

fn print_status<S: part_viewer::api::TranslationService + 'static>(
    controller: &SelectionController<S>,
) {
    let phase = match controller.phase() {
        SelectionPhase::Idle => "idle",
        SelectionPhase::Loading => "loading",
        SelectionPhase::Displaying => "displaying",
        SelectionPhase::Error => "error",
    };
    print!("[{}] > ", phase);
    use std::io::Write as _;
    let _ = std::io::stdout().flush();
}
