#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use vecna::{EngineOptions, ImageSource, PixelBuffer, TracingEngine};

/// What the engine was asked to trace.
#[derive(Debug, Clone)]
pub struct TraceCall {
    pub width: u32,
    pub height: u32,
    pub options: EngineOptions,
}

#[derive(Default)]
pub struct Script {
    init_failures: AtomicUsize,
    init_calls: AtomicUsize,
    calls: Mutex<Vec<TraceCall>>,
    reply: Mutex<Option<Result<String, String>>>,
}

/// Replies immediately; init can be told to fail a number of times.
///
/// Clones share the same script, so a test can keep one and hand the other to the pipeline.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    script: Arc<Script>,
}

impl ScriptedEngine {
    pub fn replying(reply: Result<String, String>) -> Self {
        let engine = Self::default();
        *engine.script.reply.lock() = Some(reply);
        engine
    }

    pub fn failing_init(times: usize) -> Self {
        let engine = Self::default();
        engine.script.init_failures.store(times, Ordering::SeqCst);
        engine
    }

    pub fn init_calls(&self) -> usize {
        self.script.init_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<TraceCall> {
        self.script.calls.lock().clone()
    }
}

#[async_trait]
impl TracingEngine for ScriptedEngine {
    async fn init(&self) -> Result<(), String> {
        let script = &self.script;
        script.init_calls.fetch_add(1, Ordering::SeqCst);
        if script.init_failures.load(Ordering::SeqCst) > 0 {
            script.init_failures.fetch_sub(1, Ordering::SeqCst);
            return Err("engine module failed to load".into());
        }
        Ok(())
    }

    async fn trace(&self, buffer: PixelBuffer, options: EngineOptions) -> Result<String, String> {
        let (width, height) = buffer.dimensions();
        self.script.calls.lock().push(TraceCall {
            width,
            height,
            options,
        });
        self.script.reply.lock().clone().unwrap_or_else(|| {
            Ok(format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} {height}\"></svg>"
            ))
        })
    }
}

pub type PendingTrace = (TraceCall, oneshot::Sender<Result<String, String>>);

/// Hands every trace call to the test, which resolves it whenever it likes.
pub struct GatedEngine {
    calls: mpsc::UnboundedSender<PendingTrace>,
}

impl GatedEngine {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingTrace>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Self { calls }, rx)
    }
}

#[async_trait]
impl TracingEngine for GatedEngine {
    async fn init(&self) -> Result<(), String> {
        Ok(())
    }

    async fn trace(&self, buffer: PixelBuffer, options: EngineOptions) -> Result<String, String> {
        let (width, height) = buffer.dimensions();
        let (tx, rx) = oneshot::channel();
        let call = TraceCall {
            width,
            height,
            options,
        };
        self.calls
            .send((call, tx))
            .map_err(|_| "test went away".to_string())?;
        rx.await.map_err(|_| "test went away".to_string())?
    }
}

pub fn checkerboard(width: u32, height: u32) -> ImageSource {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if (x / 50 + y / 50) % 2 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    ImageSource::from_rgba(img)
}
