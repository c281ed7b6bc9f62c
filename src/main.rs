use log::error;
use mise_import::import_recipe;
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(url) = args.get(1) else {
        eprintln!("Usage: mise-import <url>");
        return ExitCode::FAILURE;
    };

    match import_recipe(url).await {
        Ok(recipe) => match serde_json::to_string_pretty(&recipe) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to serialize result: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("Import failed: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
