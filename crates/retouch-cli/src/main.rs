use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use argh::FromArgs;

use retouch_core::client::Enhancer;
use retouch_core::config::ClientConfig;
use retouch_core::domain::EnhancementOutcome;
use retouch_core::impls::ReplicateProvider;

#[derive(FromArgs)]
/// Restore a portrait image through the remote CodeFormer provider.
///
/// Reads the provider credential from REPLICATE_API_TOKEN and prints the
/// result URL on success.
struct Args {
    /// path to the input image (jpeg, png or webp)
    #[argh(option, short = 'i')]
    image: PathBuf,

    /// seconds to wait for the prediction before giving up
    #[argh(option, short = 't', default = "10")]
    timeout_secs: u64,

    /// codeformer fidelity weight (0.0..=1.0)
    #[argh(option, default = "0.7")]
    fidelity: f64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();

    // Credential is resolved here, at the edge; the client itself never
    // reads the environment.
    let credential = std::env::var("REPLICATE_API_TOKEN").ok();

    let mut config = ClientConfig {
        credential: credential.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
        ..ClientConfig::default()
    };
    config.model_params.fidelity = args.fidelity;

    let image_bytes = match std::fs::read(&args.image) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("failed to read {}: {err}", args.image.display());
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "enhancing {} ({} bytes)",
        args.image.display(),
        image_bytes.len()
    );

    let provider = match ReplicateProvider::new(credential.as_deref().unwrap_or_default()) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("provider setup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let enhancer = Enhancer::new(Arc::new(provider), config);
    match enhancer.enhance(image_bytes).await {
        EnhancementOutcome::Success { url } => {
            println!("{url}");
            ExitCode::SUCCESS
        }
        EnhancementOutcome::Failure { kind, message } => {
            eprintln!("enhancement failed ({kind:?}, HTTP {}): {message}", kind.http_status());
            ExitCode::FAILURE
        }
    }
}
