mod cli;
mod form_tools;
mod infra;
mod routes;
mod server;

use recruit_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
