mod dog;
mod error;
mod family;
mod reminder;
mod shared;
mod status;
mod user;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use pawtime_infra::PawtimeContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    dog::configure_routes(cfg);
    family::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
    user::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    context: PawtimeContext,
}

impl Application {
    pub async fn new(context: PawtimeContext) -> Result<Self, std::io::Error> {
        // The schedule must be rebuilt from stored state before any
        // request is served.
        context.recovery().run().await.map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Alarm recovery failed: {:?}", e),
            )
        })?;

        let (server, port) = Application::configure_server(context.clone()).await?;

        Ok(Self {
            server,
            port,
            context,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: PawtimeContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .data(ctx)
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        // No further fire may start during teardown
        self.context.scheduler.clear();
        res
    }
}
