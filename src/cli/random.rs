use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tabled::Table;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    Res,
    config::Settings,
    info,
    pipeline::{Pipeline, RunOutcome},
    session::Session,
    spotify::{auth, catalog::CatalogClient},
    success,
    types::AlbumView,
    utils, warning,
};

/// Exchanges `code`, configures the catalog and runs the pipeline once.
///
/// If the exchange fails the error is returned before the catalog is
/// touched, so no run starts with placeholder tokens.
pub async fn launch<R>(
    session: &mut Session,
    catalog: &mut CatalogClient,
    pipeline: &Pipeline,
    code: &str,
    rng: &mut R,
) -> Res<RunOutcome>
where
    R: Rng,
{
    session.authorize_with_code(code).await?;
    session.configure(catalog);
    pipeline.run(&*catalog, rng).await
}

/// Shows a random album, optionally staying around for more.
///
/// # Interactive commands
///
/// - `r` or empty line: randomify again
/// - `o`: open the current album in the browser
/// - `t`: refresh the access token
/// - `q`: quit
pub async fn random(settings: Settings, seed: Option<u64>, interactive: bool, open: bool) {
    let mut session = Session::new(settings.clone());
    let mut catalog = CatalogClient::new(&settings);
    let pipeline = Pipeline::new(&settings);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let code = match auth::acquire_authorization_code(&settings).await {
        Ok(code) => code,
        Err(e) => {
            warning!("Authorization failed: {}", e);
            render(&pipeline.view().await);
            return;
        }
    };

    let pb = spinner();
    let outcome = launch(&mut session, &mut catalog, &pipeline, &code, &mut rng).await;
    pb.finish_and_clear();
    report(&pipeline, outcome, open).await;

    if !interactive {
        return;
    }

    info!("[r]andomify, [o]pen, refresh [t]oken, [q]uit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warning!("Cannot read input: {}", e);
                break;
            }
        };

        match line.trim() {
            "" | "r" => {
                if !session.is_authorized() {
                    warning!("Not authorized, nothing to fetch");
                    render(&pipeline.view().await);
                    continue;
                }
                let pb = spinner();
                let outcome = pipeline.run(&catalog, &mut rng).await;
                pb.finish_and_clear();
                report(&pipeline, outcome, open).await;
            }
            "o" => open_album(&pipeline.view().await),
            "t" => match session.refresh().await {
                Ok(tokens) => {
                    let expires_at = utils::format_timestamp(tokens.expires_at());
                    session.configure(&mut catalog);
                    success!("Token refreshed, valid until {}", expires_at);
                }
                Err(e) => warning!("Token refresh failed: {}", e),
            },
            "q" => break,
            other => warning!("Unknown command: {}", other),
        }
    }
}

async fn report(pipeline: &Pipeline, outcome: Res<RunOutcome>, open: bool) {
    match outcome {
        Ok(RunOutcome::Ready(view)) => {
            render(&view);
            if open {
                open_album(&view);
            }
        }
        Ok(RunOutcome::Superseded { run, by }) => {
            info!("Run {} was replaced by run {}", run.0, by.0)
        }
        Err(e) => {
            warning!("Cannot fetch random album: {}", e);
            render(&pipeline.view().await);
        }
    }
}

fn render(view: &AlbumView) {
    if view.is_loading() {
        info!("Loading...");
        return;
    }

    let table = Table::new(vec![utils::album_table_row(view)]);
    println!("{}", table);
}

fn open_album(view: &AlbumView) {
    if view.is_loading() {
        warning!("No album loaded yet");
        return;
    }

    if webbrowser::open(&view.album.external_url).is_err() {
        warning!("Failed to open {}", view.album.external_url);
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Loading...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
