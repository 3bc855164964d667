//! `tracker` binary: render one page of the division tracker

use anyhow::Context;
use tracker_app::cli::{self, Invocation};
use tracker_app::{logging, render, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::command().get_matches();
    let invocation = Invocation::from_matches(&matches)?;
    let (config, source) = invocation.load_config()?;
    logging::init(&config.log)?;
    source.report();

    let backend = cli::open_store(&config)
        .await
        .context("failed to open the document store")?;
    let mut session = Session::connect(backend, &config).await;
    invocation.apply(&mut session);

    let status = render::status_text(session.status());
    if !status.is_empty() {
        eprintln!("{status}");
    }
    println!("{}", render::render(&session.current_view(), invocation.format)?);

    if invocation.watch {
        let format = invocation.format;
        let refreshes = session
            .run_refresh_loop(
                |session, burst| {
                    tracing::info!(kinds = ?burst.kinds, "re-rendering");
                    match render::render(&session.current_view(), format) {
                        Ok(out) => println!("{out}"),
                        Err(e) => tracing::error!("render failed: {e}"),
                    }
                },
                async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("cannot listen for Ctrl-C: {e}");
                    }
                },
            )
            .await;
        tracing::info!(refreshes, "watch stopped");
    }

    let notices = session.take_notices();
    if !notices.is_empty() {
        eprint!("{}", render::notices_text(&notices));
    }
    Ok(())
}
