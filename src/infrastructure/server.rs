//! HTTP 连接层
//!
//! `axum::serve` 不能设置请求头读取时限和空闲连接时限，这里直接用
//! hyper-util 的 auto 连接构建器逐个服务连接：
//! - 请求头必须在 `header_read` 内读完，否则断开连接
//! - 连接上没有进行中的请求且超过 `idle` 没有新请求时，优雅关闭连接
//! - 收到停机信号后停止 accept，并等待所有连接处理完当前请求

use std::{
    future::Future,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::Router;
use hyper::{body::Incoming, service::service_fn, Request};
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::conn::auto::Builder,
};
use tokio::{net::TcpListener, sync::watch, time::Instant};
use tower::ServiceExt;
use tracing::{debug, info, warn};

/// 读取请求头的时限
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(5);
/// keep-alive 连接的空闲时限
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    pub header_read: Duration,
    pub idle: Duration,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            header_read: HEADER_READ_TIMEOUT,
            idle: IDLE_TIMEOUT,
        }
    }
}

/// 在 `listener` 上服务 `app`，`shutdown` 完成后停止
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    timeouts: ServerTimeouts,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // signal: 通知连接开始优雅关闭；close: 所有接收端释放后说明连接都已结束
    let (signal_tx, signal_rx) = watch::channel(());
    let (close_tx, close_rx) = watch::channel(());

    tokio::pin!(shutdown);

    loop {
        let (stream, remote) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        debug!("Accepted connection from {}", remote);

        let app = app.clone();
        let mut signal_rx = signal_rx.clone();
        let close_rx = close_rx.clone();

        tokio::spawn(async move {
            // 任务结束时释放，serve 借此得知连接已关闭
            let _close_rx = close_rx;
            let activity = ConnActivity::new();
            let service = {
                let activity = activity.clone();
                service_fn(move |req: Request<Incoming>| {
                    let in_flight = activity.begin();
                    let app = app.clone();
                    async move {
                        let response = app.oneshot(req).await;
                        drop(in_flight);
                        response
                    }
                })
            };

            let mut builder = Builder::new(TokioExecutor::new());
            builder
                .http1()
                .timer(TokioTimer::new())
                .header_read_timeout(timeouts.header_read);

            let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
            tokio::pin!(conn);

            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(e) = result {
                        debug!("Connection from {} ended with error: {}", remote, e);
                    }
                    return;
                }
                _ = activity.idle_for(timeouts.idle) => {
                    debug!("Closing idle connection from {}", remote);
                }
                _ = signal_rx.changed() => {}
            }

            conn.as_mut().graceful_shutdown();
            if let Err(e) = conn.as_mut().await {
                debug!("Connection from {} ended with error: {}", remote, e);
            }
        });
    }

    info!("Stopped accepting connections, waiting for open connections to finish");

    drop(signal_rx);
    drop(close_rx);
    drop(listener);
    signal_tx.send_replace(());
    close_tx.closed().await;

    Ok(())
}

/// 单个连接上的请求活动
struct ConnActivity {
    in_flight: AtomicUsize,
    last_seen: Mutex<Instant>,
}

struct InFlight(Arc<ConnActivity>);

impl ConnActivity {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            in_flight: AtomicUsize::new(0),
            last_seen: Mutex::new(Instant::now()),
        })
    }

    fn begin(self: &Arc<Self>) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.touch();
        InFlight(self.clone())
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|p| p.into_inner()) = Instant::now();
    }

    fn last_seen(&self) -> Instant {
        *self.last_seen.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// 没有进行中的请求且最近一次活动超过 `idle` 时返回
    async fn idle_for(&self, idle: Duration) {
        loop {
            let wake = if self.is_busy() {
                Instant::now() + idle
            } else {
                self.last_seen() + idle
            };
            tokio::time::sleep_until(wake).await;

            if !self.is_busy() && self.last_seen().elapsed() >= idle {
                return;
            }
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.touch();
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
