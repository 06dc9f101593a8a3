mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use cgpa_engine::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
