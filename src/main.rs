use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tmichat::app::action::Action;
use tmichat::app::event::AppEvent;
use tmichat::app::handler;
use tmichat::app::state::{AppState, ConnectionStatus};
use tmichat::auth::{extract_access_token, token_handoff, AccessToken, AuthorizationUrl};
use tmichat::config::{self, nickname::is_anonymous, AppConfig, AuthConfig};
use tmichat::irc::{ClientError, SendHandle, TmiClient};
use tmichat::logging::ChatLogger;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tmichat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load config
    let cfg = config::load_config()?;

    if let Err(e) = run_app(cfg).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(cfg: AppConfig) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(&cfg);
    let mut chat_logger = ChatLogger::new(&cfg.logging);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let token = acquire_token(&cfg, &mut stdin).await?;

    let client = Arc::new(TmiClient::with_endpoint(cfg.connection.endpoint.clone()));
    let mut client_events = client.subscribe();
    let client_tx = event_tx.clone();
    tokio::spawn(async move {
        while let Some(event) = client_events.recv().await {
            if client_tx.send(AppEvent::Client(event)).is_err() {
                break;
            }
        }
    });

    state.status = ConnectionStatus::Connecting;
    login(&client, &state.nickname, state.current_channel.as_deref(), &token).await?;
    println!("*** Connected to {} (/help for commands)", client.endpoint());

    // Spawn stdin input task
    let input_tx = event_tx.clone();
    tokio::spawn(async move {
        loop {
            match stdin.next_line().await {
                Ok(Some(line)) => {
                    if input_tx.send(AppEvent::Input(line)).is_err() {
                        break;
                    }
                }
                Ok(None) | Err(_) => {
                    let _ = input_tx.send(AppEvent::InputClosed);
                    break;
                }
            }
        }
    });

    let interrupt_tx = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(AppEvent::Interrupt);
        }
    });

    // Main event loop
    let mut should_quit = false;
    let mut reconnecting: Option<JoinHandle<()>> = None;
    while let Some(event) = event_rx.recv().await {
        for action in handler::handle_event(&mut state, event) {
            match action {
                Action::Print(line) => println!("{}", line),
                Action::LogMessage(message) => chat_logger.log_message(&message),
                Action::JoinChannel { channel } => {
                    track_send("Join", client.join_channel(&channel));
                }
                Action::SendMessage { channel, text } => {
                    track_send(
                        "Send",
                        client.send_chat_message(&state.nickname, &channel, &text),
                    );
                }
                Action::ScheduleReconnect { delay_secs } => {
                    schedule_reconnect(&event_tx, delay_secs);
                }
                Action::Reconnect => {
                    let client = client.clone();
                    let token = token.clone();
                    let nickname = state.nickname.clone();
                    let channel = state.current_channel.clone();
                    let tx = event_tx.clone();
                    reconnecting = Some(tokio::spawn(async move {
                        let result = login(&client, &nickname, channel.as_deref(), &token)
                            .await
                            .map_err(|e| format!("{:#}", e));
                        let _ = tx.send(AppEvent::ReconnectFinished(result));
                    }));
                }
                Action::Quit => should_quit = true,
            }
        }

        if should_quit {
            break;
        }
    }

    if let Some(task) = reconnecting.take() {
        task.abort();
    }
    client.disconnect().await?;
    info!("Bye");
    Ok(())
}

/// Connect, then replay PASS / NICK / JOIN. Used for the first login and for
/// every reconnect.
async fn login(
    client: &TmiClient,
    nickname: &str,
    channel: Option<&str>,
    token: &AccessToken,
) -> Result<()> {
    client
        .connect()
        .await
        .with_context(|| format!("Failed to connect to {}", client.endpoint()))?;

    let auth = client.authenticate(token.secret())?;
    let nick = client.set_nickname(nickname)?;
    auth.await?;
    nick.await?;

    if let Some(channel) = channel {
        client.join_channel(channel)?.await?;
    }
    Ok(())
}

/// Configured token, the anonymous placeholder, or one pasted on stdin after
/// the user visits the authorization URL.
async fn acquire_token(cfg: &AppConfig, stdin: &mut Lines<BufReader<Stdin>>) -> Result<AccessToken> {
    if let Some(token) = cfg.connection.access_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(AccessToken::new(token));
    }
    if is_anonymous(&cfg.connection.nickname) {
        info!("No access token configured, logging in anonymously (read-only)");
        return Ok(AccessToken::anonymous());
    }

    let url = authorization_url(&cfg.auth)?;
    println!("Authorize this client by opening:\n\n  {}\n", url);
    println!("Then paste the URL you were redirected to (or just the token):");

    let (sender, pending) = token_handoff();
    let pasted = stdin
        .next_line()
        .await?
        .context("stdin closed before a token was entered")?;
    let token = extract_access_token(&pasted).context("No access token found in input")?;
    sender.deliver(token);
    Ok(pending.await?)
}

fn authorization_url(auth: &AuthConfig) -> Result<String> {
    let redirect = auth
        .redirect_uri
        .parse()
        .with_context(|| format!("Invalid redirect_uri {:?}", auth.redirect_uri))?;
    let url = AuthorizationUrl::builder()
        .client_id(auth.client_id.clone().unwrap_or_default())
        .redirect_uri(redirect)
        .scopes(auth.scopes.iter().copied())
        .build_string()
        .context("Cannot build authorization URL; set [auth] client_id or [connection] access_token in the config")?;
    Ok(url)
}

/// Report a send's outcome without holding up the event loop.
fn track_send(what: &'static str, result: Result<SendHandle, ClientError>) {
    match result {
        Ok(handle) => {
            tokio::spawn(async move {
                if let Err(e) = handle.await {
                    error!("{} failed: {}", what, e);
                }
            });
        }
        Err(e) => println!("!!! {} failed: {}", what, e),
    }
}

fn schedule_reconnect(event_tx: &mpsc::UnboundedSender<AppEvent>, delay_secs: u64) {
    let tx = event_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        if tx.send(AppEvent::ReconnectDue).is_err() {
            warn!("Event loop gone, reconnect dropped");
        }
    });
}
