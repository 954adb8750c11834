//! # Sensor-backed biometric.
//!
//! [`SensorBackend`] turns any [`Sensor`] (fingerprint, face, iris SDK) into a
//! [`Biometric`]. It owns the method descriptor, the shared [`Lockout`] of the device
//! and the session parameters; every `authenticate` call gets its own session.
//!
//! ## Probe gating
//! ```text
//! manager_accessible = sensor.is_manager_accessible()
//! hardware_present   = manager_accessible && sensor.is_hardware_present()
//! enrolled           = hardware_present   && sensor.has_enrolled()
//! locked_out         = lockout.is_locked()
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backends::{Biometric, Sensor};
use crate::config::Config;
use crate::core::{
    attempt::{Attempt, AttemptParams, Session},
    AttemptHandle, Context, LockState, Lockout,
};
use crate::listener::ListenerRef;
use crate::method::BiometricMethod;
use crate::policies::PolicyBox;

/// Backend running sessions against a [`Sensor`].
pub struct SensorBackend<S: ?Sized> {
    method: BiometricMethod,
    ctx: Context,
    params: AttemptParams,
    lockout: Arc<Lockout>,
    sensor: Arc<S>,
}

impl<S: Sensor> SensorBackend<S> {
    /// Creates a backend for `sensor` answering as `method`.
    pub fn new(method: BiometricMethod, sensor: S, ctx: Context, cfg: &Config) -> Self {
        Self::from_arc(method, Arc::new(sensor), ctx, cfg)
    }
}

impl<S: Sensor + ?Sized> SensorBackend<S> {
    /// Creates a backend for an already shared sensor (e.g. `Arc<dyn Sensor>`).
    pub fn from_arc(method: BiometricMethod, sensor: Arc<S>, ctx: Context, cfg: &Config) -> Self {
        let lockout = Arc::new(Lockout::new(method.id(), ctx.bus().clone()));
        Self {
            method,
            ctx,
            params: AttemptParams::from(cfg),
            lockout,
            sensor,
        }
    }

    /// Device lockout state.
    pub fn lockout(&self) -> &Lockout {
        &self.lockout
    }

    pub fn lock_state(&self) -> LockState {
        self.lockout.state()
    }

    pub fn sensor(&self) -> &Arc<S> {
        &self.sensor
    }
}

impl<S: Sensor + ?Sized> Biometric for SensorBackend<S> {
    fn method(&self) -> &BiometricMethod {
        &self.method
    }

    fn is_manager_accessible(&self) -> bool {
        self.sensor.is_manager_accessible()
    }

    fn is_hardware_present(&self) -> bool {
        self.is_manager_accessible() && self.sensor.is_hardware_present()
    }

    fn has_enrolled(&self) -> bool {
        self.is_hardware_present() && self.sensor.has_enrolled()
    }

    fn is_locked_out(&self) -> bool {
        self.lockout.is_locked()
    }

    fn authenticate(
        &self,
        token: &CancellationToken,
        listener: ListenerRef,
        policy: PolicyBox,
    ) -> AttemptHandle {
        let session = Session::open(&self.ctx, self.method.id(), token, listener);
        let id = session.id();
        let session_token = session.token().clone();

        let attempt = Attempt {
            sensor: Arc::clone(&self.sensor),
            session,
            policy,
            lockout: Arc::clone(&self.lockout),
            params: self.params.clone(),
        };
        let join = self.ctx.spawn(attempt.run());
        AttemptHandle::new(id, session_token, join)
    }
}
