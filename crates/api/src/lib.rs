mod job_schedulers;
mod schedule;
mod shared;
mod status;
mod tick;

use actix_web::{dev::Server, web, App, HttpServer};
use calendar_notifier_infra::NotifierContext;
use job_schedulers::{start_rebuild_schedule_job, start_tick_job};
pub use schedule::rebuild_schedule::{
    RebuildScheduleUseCase, ScheduleSummary, UseCaseError as RebuildScheduleError,
};
use shared::usecase::execute;
use std::net::TcpListener;
pub use tick::render::{render_matches, OutgoingMessage};
pub use tick::run_tick::{RunTickUseCase, TickReport, UseCaseError as RunTickError};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
}

/// Rebuilds the notification schedule once
pub async fn rebuild_schedule(ctx: &NotifierContext) -> Result<ScheduleSummary, RebuildScheduleError> {
    execute(RebuildScheduleUseCase, ctx).await
}

/// Dispatches the notifications of the current tick once
pub async fn run_tick(ctx: &NotifierContext) -> Result<TickReport, RunTickError> {
    execute(RunTickUseCase, ctx).await
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: NotifierContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: NotifierContext) {
        start_rebuild_schedule_job(context.clone());
        start_tick_job(context);
    }

    async fn configure_server(context: NotifierContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(context.clone()))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(1)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
