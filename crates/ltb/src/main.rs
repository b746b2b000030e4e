use std::sync::Arc;

use ltb_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), ltb_core::Error> {
    ltb_core::logging::init("ltb");

    let cfg = Arc::new(Config::load()?);

    ltb_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| ltb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
