//! RAII frame requests on top of a [`FrameRuntime`](crate::FrameRuntime).

use crate::runtime::{FrameCallbackId, RuntimeHandle};
use crate::NANOS_PER_MILLI;

/// Issues one-shot frame requests against a runtime.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Runs `callback` with the next frame's timestamp in nanoseconds.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let pending = self
            .runtime
            .register_frame_callback(callback)
            .map(|id| (self.runtime.clone(), id));
        FrameCallbackRegistration { pending }
    }

    /// Runs `callback` with the next frame's timestamp in fractional
    /// milliseconds.
    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(f64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| callback(nanos as f64 / NANOS_PER_MILLI))
    }
}

/// Outstanding frame request. Dropping it withdraws the request.
pub struct FrameCallbackRegistration {
    pending: Option<(RuntimeHandle, FrameCallbackId)>,
}

impl FrameCallbackRegistration {
    /// `false` when the runtime was already gone at registration time.
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn id(&self) -> Option<FrameCallbackId> {
        self.pending.as_ref().map(|(_, id)| *id)
    }

    pub fn cancel(mut self) {
        self.withdraw();
    }

    fn withdraw(&mut self) {
        if let Some((runtime, id)) = self.pending.take() {
            runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.withdraw();
    }
}

impl std::fmt::Debug for FrameCallbackRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCallbackRegistration")
            .field("id", &self.id())
            .finish()
    }
}
