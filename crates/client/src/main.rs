use std::path::Path;
use std::process::ExitCode;

use catalog_core::controller::{QueryController, QueryState};
use catalog_core::import_schema::check_csv;
use catalog_core::paging::{total_pages, PageRequest};
use catalog_core::template::export_template;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_client::api::CatalogApi;
use catalog_client::cli::{self, CliError, Command, ListArgs, USAGE};
use catalog_client::config::ClientConfig;
use catalog_client::files::{self, load_candidate};
use catalog_client::session;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=info,catalog_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(std::env::args().skip(1)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: impl Iterator<Item = String>) -> Result<(), CliError> {
    let command = cli::parse(args)?;

    // Local commands need neither configuration nor network.
    match &command {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Template(path) => return write_template(path).await,
        Command::Check(path) => return check_file(path).await,
        _ => {}
    }

    // --- Configuration ---
    let config = ClientConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, page_size = config.page_size, "Loaded client configuration");
    let api = CatalogApi::from_config(&config)?;

    match command {
        Command::List(args) => list_products(&api, &config, args).await,
        Command::Categories => list_categories(&api).await,
        Command::Import(path) => import_file(&api, &path).await,
        Command::Delete(id) => {
            let mut controller = QueryController::new(config.page_size)?;
            session::delete_and_refresh(&mut controller, &api, id).await?;
            println!("Deleted product {id}");
            print_products(&controller)
        }
        Command::Help | Command::Template(_) | Command::Check(_) => Ok(()),
    }
}

// ---- commands ----

async fn list_products(api: &CatalogApi, config: &ClientConfig, args: ListArgs) -> Result<(), CliError> {
    let page_size = args.page_size.unwrap_or(config.page_size);
    let page = PageRequest::new(args.page.unwrap_or(1), page_size)?;
    let mut controller = QueryController::new(page_size)?;
    let ticket = controller.set_query(args.criteria, args.sort, page)?;

    session::run(&mut controller, api, ticket).await;
    print_products(&controller)
}

async fn list_categories(api: &CatalogApi) -> Result<(), CliError> {
    let categories = session::load_categories(api).await?;
    if categories.is_empty() {
        println!("No active categories");
    }
    for category in categories {
        println!("{:>6}  {}", category.category_id, category.name);
    }
    Ok(())
}

async fn import_file(api: &CatalogApi, path: &Path) -> Result<(), CliError> {
    let outcome = files::import_file(api, path).await?;

    println!("{}", outcome.message);
    println!("Inserted {} of {} rows", outcome.inserted, outcome.total);
    for failure in &outcome.failures {
        println!("  row {}: {}", failure.row_index, failure.message);
    }
    Ok(())
}

async fn write_template(path: &Path) -> Result<(), CliError> {
    let bytes = export_template()?;
    tokio::fs::write(path, bytes).await.map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn check_file(path: &Path) -> Result<(), CliError> {
    let file = load_candidate(path).await?;
    if file.extension().as_deref() != Some("csv") {
        return Err(CliError::Usage(format!(
            "check reads CSV files only, got '{}'",
            file.file_name
        )));
    }
    let report = check_csv(file.bytes.as_slice())?;

    println!("{} rows valid, {} with issues", report.valid.len(), report.failures.len());
    for failure in &report.failures {
        println!("  row {} [{}]: {}", failure.row_index, failure.reason_code, failure.message);
    }
    Ok(())
}

// ---- output ----

fn print_products(controller: &QueryController) -> Result<(), CliError> {
    if let QueryState::Failed(failure) = controller.state() {
        return Err(failure.clone().into());
    }
    let Some(page) = controller.displayed() else {
        return Ok(());
    };

    for product in &page.items {
        println!(
            "{:>6}  {:<40} {:>10} {:>6}  {:<20} {}",
            product.product_id,
            product.name,
            product.price,
            product.stock,
            product.category_name(),
            if product.is_active { "active" } else { "inactive" },
        );
    }
    let request = controller.page();
    println!(
        "Page {} of {} ({} products)",
        request.page(),
        total_pages(page.total, request.page_size()),
        page.total,
    );
    Ok(())
}
