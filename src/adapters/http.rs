//! HTTP request-router adapter.
//!
//! Implements [`RequestRouterPort`].  On ESP-IDF each path in
//! [`ROUTE_PATHS`] is registered as a GET handler on an
//! `EspHttpServer`; handlers run on the server's own task and reach the
//! log through the shared lock inside [`Routes`].  Dropping the server
//! unregisters everything.
//!
//! On the host the routes are kept in memory and requests are fed in
//! with [`HttpAdapter::dispatch`].

use log::info;

use crate::app::ports::{FileStorePort, RequestRouterPort};
use crate::error::NetworkFailure;
use crate::routes::{ROUTE_PATHS, Routes};

#[cfg(not(target_os = "espidf"))]
use crate::routes::Response;

#[cfg(target_os = "espidf")]
use esp_idf_svc::http::Method;
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::server::{Configuration as HttpConfiguration, EspHttpServer};
#[cfg(target_os = "espidf")]
use esp_idf_svc::io::Write;

#[cfg(not(target_os = "espidf"))]
type Dispatcher = Box<dyn Fn(&str) -> Option<Response> + Send>;

pub struct HttpAdapter {
    port: u16,
    #[cfg(target_os = "espidf")]
    server: Option<EspHttpServer<'static>>,
    #[cfg(not(target_os = "espidf"))]
    dispatcher: Option<Dispatcher>,
}

impl HttpAdapter {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            #[cfg(target_os = "espidf")]
            server: None,
            #[cfg(not(target_os = "espidf"))]
            dispatcher: None,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn is_serving(&self) -> bool {
        self.server.is_some()
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_serving(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Feed a GET request through the registered routes.  `None` when the
    /// router is stopped or the path is not registered.
    #[cfg(not(target_os = "espidf"))]
    pub fn dispatch(&self, uri: &str) -> Option<Response> {
        self.dispatcher.as_ref().and_then(|d| d(uri))
    }

    #[cfg(target_os = "espidf")]
    fn platform_start<S>(&mut self, routes: Routes<S>) -> Result<(), NetworkFailure>
    where
        S: FileStorePort + Send + 'static,
    {
        let conf = HttpConfiguration {
            http_port: self.port,
            ..Default::default()
        };
        let mut server = EspHttpServer::new(&conf).map_err(|e| {
            log::error!("HTTP(espidf): server start failed: {}", e);
            NetworkFailure::RouterStartFailed
        })?;

        for path in ROUTE_PATHS {
            let routes = routes.clone();
            server
                .fn_handler::<anyhow::Error, _>(path, Method::Get, move |req| {
                    let Some(resp) = routes.handle(req.uri()) else {
                        req.into_status_response(404)?;
                        return Ok(());
                    };
                    req.into_response(resp.status, None, &[("Content-Type", resp.content_type)])?
                        .write_all(&resp.body)?;
                    Ok(())
                })
                .map_err(|e| {
                    log::error!("HTTP(espidf): register {} failed: {}", path, e);
                    NetworkFailure::RouterStartFailed
                })?;
        }

        self.server = Some(server);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start<S>(&mut self, routes: Routes<S>) -> Result<(), NetworkFailure>
    where
        S: FileStorePort + Send + 'static,
    {
        self.dispatcher = Some(Box::new(move |uri: &str| routes.handle(uri)));
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&mut self) {
        self.server = None;
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&mut self) {
        self.dispatcher = None;
    }
}

impl RequestRouterPort for HttpAdapter {
    fn start_router<S>(&mut self, routes: Routes<S>) -> Result<(), NetworkFailure>
    where
        S: FileStorePort + Send + 'static,
    {
        if self.is_serving() {
            return Ok(());
        }
        self.platform_start(routes)?;
        info!("HTTP: serving {:?} on port {}", ROUTE_PATHS, self.port);
        Ok(())
    }

    fn stop_router(&mut self) {
        if !self.is_serving() {
            return;
        }
        self.platform_stop();
        info!("HTTP: stopped");
    }
}
