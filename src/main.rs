mod telemetry;

use calendar_notifier_api::{rebuild_schedule, run_tick, Application};
use calendar_notifier_infra::setup_context;
use std::io::{Error, ErrorKind};
use telemetry::{get_subscriber, init_subscriber};
use tracing::error;

enum Command {
    Serve,
    RebuildSchedule,
    RunTick,
}

impl Command {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg {
            None | Some("serve") => Some(Self::Serve),
            Some("rebuild-schedule") => Some(Self::RebuildSchedule),
            Some("run-tick") => Some(Self::RunTick),
            Some(_) => None,
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("calendar_notifier".into(), "info".into());
    init_subscriber(subscriber);

    let arg = std::env::args().nth(1);
    let command = Command::parse(arg.as_deref()).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInput,
            "Usage: calendar_notifier [serve | rebuild-schedule | run-tick]",
        )
    })?;

    let context = setup_context().map_err(|e| {
        error!("Invalid configuration: {}", e);
        Error::new(ErrorKind::InvalidInput, e)
    })?;

    match command {
        Command::Serve => {
            let app = Application::new(context).await?;
            app.start().await
        }
        Command::RebuildSchedule => rebuild_schedule(&context)
            .await
            .map(|_| ())
            .map_err(|e| Error::new(ErrorKind::Other, e)),
        Command::RunTick => run_tick(&context)
            .await
            .map(|_| ())
            .map_err(|e| Error::new(ErrorKind::Other, e)),
    }
}
