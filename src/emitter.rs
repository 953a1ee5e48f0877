//! Defines the background loop that periodically emits a demo gauge metric
//! for the imported service.
//!
//! The emitter is fully decoupled from the import pipeline: it holds only
//! the resolved service ID and a metrics sink. Failures of individual
//! iterations are logged and swallowed; nothing here can affect the
//! correctness of a completed import.

use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};
use jod_thread::JoinHandle;
use rand::Rng;

use crate::metrics::{MetricsSink, Point};

pub struct DemoMetricEmitter {
    shutdown_sender: Sender<()>,
    _thread_handle: JoinHandle<()>,
}

impl DemoMetricEmitter {
    pub fn start<M: MetricsSink + Send + 'static>(
        sink: M,
        workspace_id: String,
        service_id: String,
        interval: Duration,
    ) -> DemoMetricEmitter {
        let (shutdown_sender, shutdown_receiver) = crossbeam_channel::bounded(1);

        let thread_handle = jod_thread::Builder::new()
            .name("DemoMetricEmitter thread".to_owned())
            .spawn(move || {
                log::trace!("DemoMetricEmitter thread started");
                Self::main_task(shutdown_receiver, sink, workspace_id, service_id, interval);
                log::trace!("DemoMetricEmitter thread stopped");
            })
            .expect("Could not start DemoMetricEmitter thread");

        DemoMetricEmitter {
            shutdown_sender,
            _thread_handle: thread_handle,
        }
    }

    fn main_task<M: MetricsSink>(
        shutdown_receiver: Receiver<()>,
        sink: M,
        workspace_id: String,
        service_id: String,
        interval: Duration,
    ) {
        let ticker = crossbeam_channel::tick(interval);

        loop {
            select! {
                recv(ticker) -> _ => {
                    let visitors = rand::thread_rng().gen_range(0..2000);
                    let point = Point::demo_gauge(&workspace_id, &service_id, visitors as f64);

                    match sink.create_point(&point) {
                        Ok(()) => log::debug!("Emitted demo metric ({} visitors)", visitors),
                        Err(err) => log::error!("Could not emit demo metric: {}", err),
                    }
                },
                recv(shutdown_receiver) -> _ => {
                    log::trace!("DemoMetricEmitter shutdown signal received...");
                    break;
                },
            }
        }
    }
}

impl Drop for DemoMetricEmitter {
    fn drop(&mut self) {
        let _ = self.shutdown_sender.send(());
    }
}
