use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use anyhow::Result;
use tokio::sync::watch;
use tokio_stream::Stream;
use winq_dataset::{DataSet, SchemaRef};
use winq_planner::physical_plan::PhysicalPlan;

use crate::{SourceRegistry, StreamConfigRef};

pub type DataSetStream = Pin<Box<dyn Stream<Item = Result<DataSet>> + Send + 'static>>;

pub struct CreateStreamContext<'a> {
    pub config: StreamConfigRef,
    pub plan: &'a PhysicalPlan,
    pub sources: &'a SourceRegistry,
    pub shutdown: watch::Receiver<bool>,
}

/// Cancels the [`DataStream`] it was taken from.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    /// The stream stops pulling its input and ends with an
    /// [`ExecutionCancelled`](crate::ExecutionCancelled) error.
    pub fn shutdown(&self) {
        let _ = self.0.send(true);
    }
}

/// Resolves once a shutdown was requested, never if every handle is gone.
pub(crate) async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            futures_util::future::pending::<()>().await;
        }
    }
}

/// The output of a physical plan, pulled batch by batch.
pub struct DataStream {
    config: StreamConfigRef,
    schema: SchemaRef,
    stream: DataSetStream,
    shutdown: ShutdownHandle,
}

impl DataStream {
    pub fn try_new(
        config: StreamConfigRef,
        plan: &PhysicalPlan,
        sources: &SourceRegistry,
    ) -> Result<Self> {
        let (tx_shutdown, rx_shutdown) = watch::channel(false);
        let ctx = CreateStreamContext {
            config: config.clone(),
            plan,
            sources,
            shutdown: rx_shutdown,
        };
        let stream = crate::streams::create_stream(&ctx, plan.root().id())?;

        tracing::info!(
            name = %config.name,
            nodes = plan.node_count(),
            sources = plan.source_count(),
            "stream created"
        );
        tracing::debug!(name = %config.name, plan = %plan, "physical plan");

        Ok(Self {
            config,
            schema: plan.root().schema(),
            stream,
            shutdown: ShutdownHandle(Arc::new(tx_shutdown)),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }
}

impl Stream for DataStream {
    type Item = Result<DataSet>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}
