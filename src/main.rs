use color_eyre::Result;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use hostlink::cli::{parse_args, CliCommand};
use hostlink::credentials::Credential;
use hostlink::websocket::{ClientConfig, HandshakeClient};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match parse_args(std::env::args()) {
        Ok(CliCommand::Version) => {
            println!("hostlink {}", VERSION);
            return Ok(());
        }
        Ok(CliCommand::Run(args)) => args,
        Err(usage) => {
            eprintln!("{}", usage);
            std::process::exit(2);
        }
    };

    // The token must be in hand before the socket is opened; a missing or
    // unreadable file is fatal.
    let credential = Credential::from_file(&args.token_file)?;

    let config = ClientConfig::new(args.plugin_id, args.host);
    let mut client = HandshakeClient::connect(config, &credential).await?;

    // The event loop answers readiness queries on its own; this task just
    // drains messages nobody handles and waits for Ctrl-C. A dead socket
    // does not end the process by itself.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                client.shutdown();
                // Let the event loop flush its close frame before exiting.
                client.closed().await;
                break;
            }
            maybe = client.recv() => {
                match maybe {
                    Some(envelope) => {
                        debug!("Unhandled host message of type {:?}", envelope.message_type);
                    }
                    None => {
                        error!("Connection to host is gone; waiting for Ctrl-C");
                        tokio::signal::ctrl_c().await?;
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
