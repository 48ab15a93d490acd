//! Generic service invocation: `nanokvm call <service> --params '{...}'`.
//!
//! Routes through the same service table a host automation layer would
//! use, so the full parameter validation path applies.

use serde_json::Value;

use nanokvm_core::{ActionRequest, Coordinator, service};

use crate::cli::{CallArgs, GlobalOpts};
use crate::error::CliError;

pub async fn handle(
    coordinator: &Coordinator,
    args: CallArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let params: Value = match args.params.as_deref() {
        Some(raw) => serde_json::from_str(raw)?,
        None => Value::Null,
    };

    let request = service::build_action(&args.service, params)?;

    // The HDMI gate checks the hardware revision from the snapshot.
    if matches!(request, ActionRequest::ResetHdmi) {
        coordinator.refresh().await?;
    }

    coordinator.execute(request).await?;

    if !global.quiet {
        eprintln!("Service '{}' dispatched", args.service);
    }
    Ok(())
}
