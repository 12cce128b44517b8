mod cli;
mod diag;
mod infra;
mod routes;
mod server;

use lead_funnel::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
