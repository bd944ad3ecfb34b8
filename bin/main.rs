use tracing::info;
use tracing::trace;
use tracing_subscriber;

use clap::{value_t, values_t, App, Arg};

use std::path::Path;
use zfx_mixer::server::node;
use zfx_mixer::server::settings::Settings;
use zfx_mixer::Result;

const DEFAULT_HOME_DIR: &str = "src/server/settings";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(true)
        .compact()
        .with_max_level(tracing::Level::INFO)
        .init();

    let matches = App::new("zfx-mixer")
        .version("0.1")
        .author("zero.fx labs ltd.")
        .about("Runs a model mixer node")
        .arg(
            Arg::with_name("listener-ip")
                .short("a")
                .long("listener-ip")
                .value_name("LISTENER_IP")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed-peer")
                .short("b")
                .long("seed-peer")
                .value_name("SEED_PEER")
                .multiple(true),
        )
        .arg(
            Arg::with_name("count-threshold")
                .long("count-threshold")
                .value_name("COUNT")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("tick-threshold")
                .long("tick-threshold")
                .value_name("SECONDS")
                .takes_value(true),
        )
        .arg(Arg::with_name("timeout").long("timeout").value_name("SECONDS").takes_value(true))
        .arg(Arg::with_name("home").short("h").long("home").takes_value(true).required(false))
        .get_matches();

    let home_dir = matches.value_of("home").unwrap_or(DEFAULT_HOME_DIR);
    let mut settings = Settings::new(Path::new(home_dir)).expect("failed to load configuration.");

    if let Some(ip) = matches.value_of("listener-ip") {
        trace!("CLI arg for listener-ip provided: {}", ip);
        settings.listener_ip = ip.to_owned();
    }

    if let Some(peers) = matches.values_of("seed-peer") {
        trace!("CLI arg for seed-peer provided: {:?}", peers);
        settings.seed_peers =
            values_t!(matches.values_of("seed-peer"), String).unwrap_or_else(|e| e.exit());
    }

    if matches.is_present("count-threshold") {
        settings.count_threshold =
            value_t!(matches.value_of("count-threshold"), u64).unwrap_or_else(|e| e.exit());
    }

    if matches.is_present("tick-threshold") {
        settings.tick_threshold_secs =
            value_t!(matches.value_of("tick-threshold"), u64).unwrap_or_else(|e| e.exit());
    }

    if matches.is_present("timeout") {
        settings.timeout_secs =
            value_t!(matches.value_of("timeout"), u64).unwrap_or_else(|e| e.exit());
    }

    let sys = actix::System::new();
    sys.block_on(async move {
        node::run(settings).unwrap();

        let sig = if cfg!(unix) {
            use futures::future::FutureExt;
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigint = signal(SignalKind::interrupt()).unwrap();
            let mut sigterm = signal(SignalKind::terminate()).unwrap();

            futures::select! {
                _ = sigint.recv().fuse() => "SIGINT",
                _ = sigterm.recv().fuse() => "SIGTERM"
            }
        } else {
            tokio::signal::ctrl_c().await.unwrap();
            "Ctrl+C"
        };
        info!(target: "zfx-mixer", "Got {}, stopping...", sig);

        actix::System::current().stop();
    });
    sys.run().unwrap();

    Ok(())
}
