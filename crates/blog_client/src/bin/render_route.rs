//! crates/blog_client/src/bin/render_route.rs
//!
//! Renders one route against a running API and prints what a browser host
//! would have been asked to show.
//!
//! Usage: render_route '#/blog/some-blog-id'

use std::sync::Arc;

use blog_client::views::toast::toast_stack;
use blog_client::{App, ClientConfig, MemoryBackend, MemoryHost};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let fragment = std::env::args().nth(1).unwrap_or_else(|| "#/".to_string());
    info!("Rendering {} against {}", fragment, config.server_domain);

    let host = Arc::new(MemoryHost::new());
    let app = App::new(config, Arc::new(MemoryBackend::new()), host.clone())?;
    app.handle_location(&fragment).await;

    match host.mounted() {
        Some(html) => println!("{}", html),
        None => println!("(nothing mounted)"),
    }
    for fragment in host.navigations() {
        info!("Host asked to navigate to {}", fragment);
    }
    let toasts = host.toasts();
    if !toasts.is_empty() {
        println!("{}", toast_stack(&toasts).into_string());
    }
    Ok(())
}
